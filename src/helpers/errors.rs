use axum::{http::StatusCode, response::Json};
use compute::ComputeError;
use tracing::error;

use crate::ai::AiError;
use crate::schemas::ErrorResponse;
use crate::store::StoreError;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", err);
        }
        error_response(status, err.to_string(), &err.code())
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InvalidInput(_) => {
                error_response(StatusCode::BAD_REQUEST, err.to_string(), "VALIDATION_ERROR")
            }
            other => {
                error!("Suggestion request failed: {}", other);
                error_response(StatusCode::BAD_GATEWAY, other.to_string(), "AI_UPSTREAM_ERROR")
            }
        }
    }
}

pub fn compute_error(err: ComputeError) -> ApiError {
    match err {
        ComputeError::PayoffNotReached { .. } => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            err.to_string(),
            "PAYOFF_NOT_REACHED",
        ),
        other => error_response(StatusCode::BAD_REQUEST, other.to_string(), "VALIDATION_ERROR"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status_and_code() {
        let (status, Json(body)) = ApiError::from(StoreError::not_found("budget category", 4));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "BUDGET_CATEGORY_NOT_FOUND");
        assert!(!body.success);

        let (status, Json(body)) = ApiError::from(StoreError::Conflict("dup".to_string()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "CONSTRAINT_VIOLATION");

        let (status, _) = ApiError::from(StoreError::Validation("bad".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ai_errors_are_bad_gateway_unless_input_is_invalid() {
        let (status, _) = ApiError::from(AiError::InvalidInput("empty".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, Json(body)) = ApiError::from(AiError::InvalidOutput("garbage".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "AI_UPSTREAM_ERROR");
    }
}
