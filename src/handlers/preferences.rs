use axum::{
    extract::{Path, State},
    response::Json,
};
use axum_valid::Valid;
use common::{PreferencesDto, UpdatePreferencesRequest};
use tracing::{instrument, trace};

use crate::helpers::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store::preferences;

/// Get the preferences of a user, defaults if none were saved
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/preferences",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Preferences retrieved successfully", body = ApiResponse<PreferencesDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<PreferencesDto>>, ApiError> {
    trace!("Entering get_preferences function");
    let prefs = preferences::get_or_default(&state.db, &user_id).await?;
    Ok(Json(ApiResponse::new(prefs, "Preferences retrieved successfully")))
}

/// Update the preferences of a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/preferences",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Preferences updated successfully", body = ApiResponse<PreferencesDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<UpdatePreferencesRequest>>,
) -> Result<Json<ApiResponse<PreferencesDto>>, ApiError> {
    trace!("Entering update_preferences function");
    let prefs = preferences::update(&state.db, &user_id, request).await?;
    Ok(Json(ApiResponse::new(prefs, "Preferences updated successfully")))
}
