use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateRecurringTransactionRequest, RecurringTransactionDto, UpdateRecurringTransactionRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::recurring_transactions;

/// Create a recurring transaction
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/recurring-transactions",
    tag = "recurring-transactions",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateRecurringTransactionRequest,
    responses(
        (status = 201, description = "Recurring transaction created successfully", body = ApiResponse<RecurringTransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_recurring_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateRecurringTransactionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<RecurringTransactionDto>>), ApiError> {
    trace!("Entering create_recurring_transaction function");
    let created = recurring_transactions::create(&state.db, &user_id, request).await?;
    state.invalidate_forecasts();
    info!("Recurring transaction {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Recurring transaction created successfully")),
    ))
}

/// List the recurring transactions of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/recurring-transactions",
    tag = "recurring-transactions",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Recurring transactions retrieved successfully", body = ApiResponse<Vec<RecurringTransactionDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_recurring_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<RecurringTransactionDto>>>, ApiError> {
    trace!("Entering get_recurring_transactions function");
    let items = recurring_transactions::list(&state.db, &user_id).await?;
    debug!("Returning {} recurring transactions", items.len());
    Ok(Json(ApiResponse::new(items, "Recurring transactions retrieved successfully")))
}

/// Get a recurring transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/recurring-transactions/{recurring_id}",
    tag = "recurring-transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring transaction ID"),
    ),
    responses(
        (status = 200, description = "Recurring transaction retrieved successfully", body = ApiResponse<RecurringTransactionDto>),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_recurring_transaction(
    State(state): State<AppState>,
    Path((user_id, recurring_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<RecurringTransactionDto>>, ApiError> {
    trace!("Entering get_recurring_transaction function");
    let item = recurring_transactions::get(&state.db, &user_id, recurring_id).await?;
    Ok(Json(ApiResponse::new(item, "Recurring transaction retrieved successfully")))
}

/// Update a recurring transaction; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/recurring-transactions/{recurring_id}",
    tag = "recurring-transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring transaction ID"),
    ),
    request_body = UpdateRecurringTransactionRequest,
    responses(
        (status = 200, description = "Recurring transaction updated successfully", body = ApiResponse<RecurringTransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_recurring_transaction(
    State(state): State<AppState>,
    Path((user_id, recurring_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateRecurringTransactionRequest>>,
) -> Result<Json<ApiResponse<RecurringTransactionDto>>, ApiError> {
    trace!("Entering update_recurring_transaction function");
    let updated = recurring_transactions::update(&state.db, &user_id, recurring_id, request).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(updated, "Recurring transaction updated successfully")))
}

/// Delete a recurring transaction
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/recurring-transactions/{recurring_id}",
    tag = "recurring-transactions",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring transaction ID"),
    ),
    responses(
        (status = 200, description = "Recurring transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_recurring_transaction(
    State(state): State<AppState>,
    Path((user_id, recurring_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_recurring_transaction function");
    recurring_transactions::delete(&state.db, &user_id, recurring_id).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(
        format!("Recurring transaction {} deleted", recurring_id),
        "Recurring transaction deleted successfully",
    )))
}
