use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateAccountRequest, AccountDto, UpdateAccountRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::accounts;

/// Create a account
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/accounts",
    tag = "accounts",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateAccountRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    trace!("Entering create_account function");
    let created = accounts::create(&state.db, &user_id, request).await?;
    info!("Account {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Account created successfully")),
    ))
}

/// List the accounts of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/accounts",
    tag = "accounts",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_accounts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AccountDto>>>, ApiError> {
    trace!("Entering get_accounts function");
    let items = accounts::list(&state.db, &user_id).await?;
    debug!("Returning {} accounts", items.len());
    Ok(Json(ApiResponse::new(items, "Accounts retrieved successfully")))
}

/// Get a account by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/accounts/{account_id}",
    tag = "accounts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountDto>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path((user_id, account_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    trace!("Entering get_account function");
    let item = accounts::get(&state.db, &user_id, account_id).await?;
    Ok(Json(ApiResponse::new(item, "Account retrieved successfully")))
}

/// Update a account; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/accounts/{account_id}",
    tag = "accounts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<AccountDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_account(
    State(state): State<AppState>,
    Path((user_id, account_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateAccountRequest>>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    trace!("Entering update_account function");
    let updated = accounts::update(&state.db, &user_id, account_id, request).await?;
    Ok(Json(ApiResponse::new(updated, "Account updated successfully")))
}

/// Delete a account
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/accounts/{account_id}",
    tag = "accounts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path((user_id, account_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_account function");
    accounts::delete(&state.db, &user_id, account_id).await?;
    Ok(Json(ApiResponse::new(
        format!("Account {} deleted", account_id),
        "Account deleted successfully",
    )))
}
