use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use common::{AuthOutcome, CurrentUserDto, LoginRequest, OnboardingOutcome};
use tracing::{debug, instrument, trace, warn};

use crate::helpers::errors::{error_response, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::session::SessionContext;

fn session(state: &AppState) -> Result<Arc<SessionContext>, ApiError> {
    state.session.clone().ok_or_else(|| {
        warn!("Auth endpoint called without a configured auth provider");
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Authentication is not configured",
            "AUTH_NOT_CONFIGURED",
        )
    })
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AuthOutcome>),
        (status = 401, description = "Sign in failed", body = ApiResponse<AuthOutcome>),
        (status = 503, description = "Authentication is not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AuthOutcome>>), ApiError> {
    trace!("Entering login function");
    let session = session(&state)?;
    let outcome = session.login(&state.db, &request.email, &request.password).await;

    if outcome.success {
        Ok((StatusCode::OK, Json(ApiResponse::new(outcome, "Signed in successfully"))))
    } else {
        debug!("Login failed: {:?}", outcome.error);
        Ok((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse {
                data: outcome,
                message: "Sign in failed".to_string(),
                success: false,
            }),
        ))
    }
}

/// Sign out and clear the session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = ApiResponse<AuthOutcome>),
        (status = 503, description = "Authentication is not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Json<ApiResponse<AuthOutcome>>, ApiError> {
    let outcome = session(&state)?.logout().await;
    Ok(Json(ApiResponse::new(outcome, "Signed out successfully")))
}

/// The signed in user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Signed in user", body = ApiResponse<CurrentUserDto>),
        (status = 401, description = "Nobody is signed in", body = ErrorResponse),
        (status = 503, description = "Authentication is not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn current_user(State(state): State<AppState>) -> Result<Json<ApiResponse<CurrentUserDto>>, ApiError> {
    match session(&state)?.current_user().await {
        Some(user) => Ok(Json(ApiResponse::new(user, "Current user retrieved successfully"))),
        None => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Nobody is signed in",
            "NOT_AUTHENTICATED",
        )),
    }
}

/// Hide onboarding for the signed in user
///
/// Always succeeds; when the flag cannot be saved the response carries a
/// notice.
#[utoipa::path(
    post,
    path = "/api/v1/auth/onboarding/complete",
    tag = "auth",
    responses(
        (status = 200, description = "Onboarding hidden", body = ApiResponse<OnboardingOutcome>),
        (status = 503, description = "Authentication is not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn complete_onboarding(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OnboardingOutcome>>, ApiError> {
    let outcome = session(&state)?.complete_onboarding(&state.db).await;
    let message = if outcome.notice.is_some() {
        "Onboarding hidden, but the change was not saved"
    } else {
        "Onboarding completed"
    };
    Ok(Json(ApiResponse::new(outcome, message)))
}
