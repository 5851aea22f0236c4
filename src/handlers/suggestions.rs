use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use common::{
    CategorizeTransactionInput, CategorizeTransactionOutput, SuggestExpenseCategoriesInput,
    SuggestExpenseCategoriesOutput,
};
use tracing::{instrument, trace, warn};

use crate::ai::{self, PromptModel};
use crate::helpers::errors::{error_response, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

fn model(state: &AppState) -> Result<Arc<dyn PromptModel>, ApiError> {
    state.ai.clone().ok_or_else(|| {
        warn!("Suggestion endpoint called without a configured model");
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Suggestions are not configured",
            "AI_NOT_CONFIGURED",
        )
    })
}

/// Suggest a category for a transaction description
#[utoipa::path(
    post,
    path = "/api/v1/ai/categorize-transaction",
    tag = "ai",
    request_body = CategorizeTransactionInput,
    responses(
        (status = 200, description = "Category suggested", body = ApiResponse<CategorizeTransactionOutput>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "The model failed or answered out of schema", body = ErrorResponse),
        (status = 503, description = "Suggestions are not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn categorize_transaction(
    State(state): State<AppState>,
    Json(input): Json<CategorizeTransactionInput>,
) -> Result<Json<ApiResponse<CategorizeTransactionOutput>>, ApiError> {
    trace!("Entering categorize_transaction function");
    let model = model(&state)?;
    let output = ai::categorize_transaction(model.as_ref(), input).await?;
    Ok(Json(ApiResponse::new(output, "Category suggested")))
}

/// Suggest up to five expense categories for a description
#[utoipa::path(
    post,
    path = "/api/v1/ai/suggest-expense-categories",
    tag = "ai",
    request_body = SuggestExpenseCategoriesInput,
    responses(
        (status = 200, description = "Categories suggested", body = ApiResponse<SuggestExpenseCategoriesOutput>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "The model failed or answered out of schema", body = ErrorResponse),
        (status = 503, description = "Suggestions are not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn suggest_expense_categories(
    State(state): State<AppState>,
    Json(input): Json<SuggestExpenseCategoriesInput>,
) -> Result<Json<ApiResponse<SuggestExpenseCategoriesOutput>>, ApiError> {
    trace!("Entering suggest_expense_categories function");
    let model = model(&state)?;
    let output = ai::suggest_expense_categories(model.as_ref(), input).await?;
    Ok(Json(ApiResponse::new(output, "Categories suggested")))
}
