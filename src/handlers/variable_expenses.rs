use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateVariableExpenseRequest, VariableExpenseDto, UpdateVariableExpenseRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::variable_expenses;

/// Create a variable expense
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/variable-expenses",
    tag = "variable-expenses",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateVariableExpenseRequest,
    responses(
        (status = 201, description = "Variable expense created successfully", body = ApiResponse<VariableExpenseDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_variable_expense(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateVariableExpenseRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<VariableExpenseDto>>), ApiError> {
    trace!("Entering create_variable_expense function");
    let created = variable_expenses::create(&state.db, &user_id, request).await?;
    info!("Variable expense {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Variable expense created successfully")),
    ))
}

/// List the variable expenses of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/variable-expenses",
    tag = "variable-expenses",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Variable expenses retrieved successfully", body = ApiResponse<Vec<VariableExpenseDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_variable_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<VariableExpenseDto>>>, ApiError> {
    trace!("Entering get_variable_expenses function");
    let items = variable_expenses::list(&state.db, &user_id).await?;
    debug!("Returning {} variable expenses", items.len());
    Ok(Json(ApiResponse::new(items, "Variable expenses retrieved successfully")))
}

/// Get a variable expense by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/variable-expenses/{expense_id}",
    tag = "variable-expenses",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("expense_id" = i32, Path, description = "Variable expense ID"),
    ),
    responses(
        (status = 200, description = "Variable expense retrieved successfully", body = ApiResponse<VariableExpenseDto>),
        (status = 404, description = "Variable expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_variable_expense(
    State(state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<VariableExpenseDto>>, ApiError> {
    trace!("Entering get_variable_expense function");
    let item = variable_expenses::get(&state.db, &user_id, expense_id).await?;
    Ok(Json(ApiResponse::new(item, "Variable expense retrieved successfully")))
}

/// Update a variable expense; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/variable-expenses/{expense_id}",
    tag = "variable-expenses",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("expense_id" = i32, Path, description = "Variable expense ID"),
    ),
    request_body = UpdateVariableExpenseRequest,
    responses(
        (status = 200, description = "Variable expense updated successfully", body = ApiResponse<VariableExpenseDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Variable expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_variable_expense(
    State(state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateVariableExpenseRequest>>,
) -> Result<Json<ApiResponse<VariableExpenseDto>>, ApiError> {
    trace!("Entering update_variable_expense function");
    let updated = variable_expenses::update(&state.db, &user_id, expense_id, request).await?;
    Ok(Json(ApiResponse::new(updated, "Variable expense updated successfully")))
}

/// Delete a variable expense
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/variable-expenses/{expense_id}",
    tag = "variable-expenses",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("expense_id" = i32, Path, description = "Variable expense ID"),
    ),
    responses(
        (status = 200, description = "Variable expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Variable expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_variable_expense(
    State(state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_variable_expense function");
    variable_expenses::delete(&state.db, &user_id, expense_id).await?;
    Ok(Json(ApiResponse::new(
        format!("Variable expense {} deleted", expense_id),
        "Variable expense deleted successfully",
    )))
}
