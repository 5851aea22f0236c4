use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateTransactionRequest, TransactionDto, UpdateTransactionRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::transactions;

/// Create a transaction
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateTransactionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionDto>>), ApiError> {
    trace!("Entering create_transaction function");
    let created = transactions::create(&state.db, &user_id, request).await?;
    info!("Transaction {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Transaction created successfully")),
    ))
}

/// List the transactions of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TransactionDto>>>, ApiError> {
    trace!("Entering get_transactions function");
    let items = transactions::list(&state.db, &user_id).await?;
    debug!("Returning {} transactions", items.len());
    Ok(Json(ApiResponse::new(items, "Transactions retrieved successfully")))
}

/// Get a transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionDto>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<TransactionDto>>, ApiError> {
    trace!("Entering get_transaction function");
    let item = transactions::get(&state.db, &user_id, transaction_id).await?;
    Ok(Json(ApiResponse::new(item, "Transaction retrieved successfully")))
}

/// Update a transaction; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateTransactionRequest>>,
) -> Result<Json<ApiResponse<TransactionDto>>, ApiError> {
    trace!("Entering update_transaction function");
    let updated = transactions::update(&state.db, &user_id, transaction_id, request).await?;
    Ok(Json(ApiResponse::new(updated, "Transaction updated successfully")))
}

/// Delete a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_transaction function");
    transactions::delete(&state.db, &user_id, transaction_id).await?;
    Ok(Json(ApiResponse::new(
        format!("Transaction {} deleted", transaction_id),
        "Transaction deleted successfully",
    )))
}
