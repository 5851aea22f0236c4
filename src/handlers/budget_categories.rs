use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateBudgetCategoryRequest, BudgetCategoryDto, UpdateBudgetCategoryRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::budget_categories;

/// Create a budget category
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/budget-categories",
    tag = "budget-categories",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateBudgetCategoryRequest,
    responses(
        (status = 201, description = "Budget category created successfully", body = ApiResponse<BudgetCategoryDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_budget_category(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateBudgetCategoryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetCategoryDto>>), ApiError> {
    trace!("Entering create_budget_category function");
    let created = budget_categories::create(&state.db, &user_id, request).await?;
    state.invalidate_forecasts();
    info!("Budget category {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Budget category created successfully")),
    ))
}

/// List the budget categories of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/budget-categories",
    tag = "budget-categories",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Budget categories retrieved successfully", body = ApiResponse<Vec<BudgetCategoryDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_budget_categories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<BudgetCategoryDto>>>, ApiError> {
    trace!("Entering get_budget_categories function");
    let items = budget_categories::list(&state.db, &user_id).await?;
    debug!("Returning {} budget categories", items.len());
    Ok(Json(ApiResponse::new(items, "Budget categories retrieved successfully")))
}

/// Get a budget category by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/budget-categories/{budget_category_id}",
    tag = "budget-categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("budget_category_id" = i32, Path, description = "Budget category ID"),
    ),
    responses(
        (status = 200, description = "Budget category retrieved successfully", body = ApiResponse<BudgetCategoryDto>),
        (status = 404, description = "Budget category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_budget_category(
    State(state): State<AppState>,
    Path((user_id, budget_category_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<BudgetCategoryDto>>, ApiError> {
    trace!("Entering get_budget_category function");
    let item = budget_categories::get(&state.db, &user_id, budget_category_id).await?;
    Ok(Json(ApiResponse::new(item, "Budget category retrieved successfully")))
}

/// Update a budget category; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/budget-categories/{budget_category_id}",
    tag = "budget-categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("budget_category_id" = i32, Path, description = "Budget category ID"),
    ),
    request_body = UpdateBudgetCategoryRequest,
    responses(
        (status = 200, description = "Budget category updated successfully", body = ApiResponse<BudgetCategoryDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Budget category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_budget_category(
    State(state): State<AppState>,
    Path((user_id, budget_category_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateBudgetCategoryRequest>>,
) -> Result<Json<ApiResponse<BudgetCategoryDto>>, ApiError> {
    trace!("Entering update_budget_category function");
    let updated = budget_categories::update(&state.db, &user_id, budget_category_id, request).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(updated, "Budget category updated successfully")))
}

/// Delete a budget category
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/budget-categories/{budget_category_id}",
    tag = "budget-categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("budget_category_id" = i32, Path, description = "Budget category ID"),
    ),
    responses(
        (status = 200, description = "Budget category deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Budget category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_budget_category(
    State(state): State<AppState>,
    Path((user_id, budget_category_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_budget_category function");
    budget_categories::delete(&state.db, &user_id, budget_category_id).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(
        format!("Budget category {} deleted", budget_category_id),
        "Budget category deleted successfully",
    )))
}
