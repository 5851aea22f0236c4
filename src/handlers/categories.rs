use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CreateCategoryRequest, CategoryDto, UpdateCategoryRequest};
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::categories;

/// Create a category
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Constraint violation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateCategoryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryDto>>), ApiError> {
    trace!("Entering create_category function");
    let created = categories::create(&state.db, &user_id, request).await?;
    info!("Category {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Category created successfully")),
    ))
}

/// List the categories of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    trace!("Entering get_categories function");
    let items = categories::list(&state.db, &user_id).await?;
    debug!("Returning {} categories", items.len());
    Ok(Json(ApiResponse::new(items, "Categories retrieved successfully")))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category retrieved successfully", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    trace!("Entering get_category function");
    let item = categories::get(&state.db, &user_id, category_id).await?;
    Ok(Json(ApiResponse::new(item, "Category retrieved successfully")))
}

/// Update a category; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Constraint violation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateCategoryRequest>>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    trace!("Entering update_category function");
    let updated = categories::update(&state.db, &user_id, category_id, request).await?;
    Ok(Json(ApiResponse::new(updated, "Category updated successfully")))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_category function");
    categories::delete(&state.db, &user_id, category_id).await?;
    Ok(Json(ApiResponse::new(
        format!("Category {} deleted", category_id),
        "Category deleted successfully",
    )))
}
