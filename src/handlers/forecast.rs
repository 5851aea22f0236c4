use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use axum_valid::Valid;
use chrono::{Datelike, Utc};
use common::BudgetForecastDto;
use compute::forecast_year;
use tracing::{debug, info, instrument, trace};

use crate::helpers::converters::forecast_to_dto;
use crate::helpers::errors::{compute_error, ApiError};
use crate::schemas::{forecast_cache_key, ApiResponse, AppState, CachedData, ErrorResponse, ForecastQuery};
use crate::store::{budget_categories, debt_accounts, recurring_transactions};

/// Caches `forecast`, read at `generation`, unless a write invalidated the
/// forecasts in the meantime.
async fn cache_forecast(state: &AppState, key: String, generation: u64, forecast: BudgetForecastDto) {
    state.cache.insert(key.clone(), CachedData::Forecast(forecast)).await;
    if state.forecast_generation() != generation {
        debug!("Forecast {} went stale while computing, not caching it", key);
        state.cache.invalidate(&key).await;
    }
}

/// Yearly budget forecast of a user
///
/// Income and fixed expenses come from recurring transactions, debt payments
/// from each debt's minimum on its payment day, and the variable budget from
/// the budget categories.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/forecast",
    tag = "forecast",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ForecastQuery,
    ),
    responses(
        (status = 200, description = "Forecast computed successfully", body = ApiResponse<BudgetForecastDto>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
) -> Result<Json<ApiResponse<BudgetForecastDto>>, ApiError> {
    trace!("Entering get_forecast function");
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let cache_key = forecast_cache_key(&user_id, year);

    if let Some(CachedData::Forecast(cached)) = state.cache.get(&cache_key).await {
        debug!("Returning cached forecast for {}", cache_key);
        return Ok(Json(ApiResponse::new(cached, "Forecast retrieved from cache")));
    }

    let generation = state.forecast_generation();
    let recurring = recurring_transactions::list_models(&state.db, &user_id).await?;
    let debts = debt_accounts::list_models(&state.db, &user_id).await?;
    let budgets = budget_categories::list_models(&state.db, &user_id).await?;

    let forecast = forecast_to_dto(&user_id, forecast_year(year, &recurring, &debts, &budgets).map_err(compute_error)?);
    cache_forecast(&state, cache_key, generation, forecast.clone()).await;
    info!("Forecast {} of user {} computed, net {}", year, user_id, forecast.totals.net);

    Ok(Json(ApiResponse::new(forecast, "Forecast computed successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_app_state;

    async fn empty_forecast() -> BudgetForecastDto {
        forecast_to_dto("user-1", forecast_year(2024, &[], &[], &[]).unwrap())
    }

    #[tokio::test]
    async fn test_forecast_cached_when_nothing_changed() {
        let state = setup_test_app_state().await;
        let key = forecast_cache_key("user-1", 2024);
        let generation = state.forecast_generation();

        cache_forecast(&state, key.clone(), generation, empty_forecast().await).await;

        assert!(state.cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_forecast_computed_before_a_write_is_not_cached() {
        let state = setup_test_app_state().await;
        let key = forecast_cache_key("user-1", 2024);
        let generation = state.forecast_generation();

        // A write lands between reading the rows and caching the result.
        state.invalidate_forecasts();
        cache_forecast(&state, key.clone(), generation, empty_forecast().await).await;

        assert!(state.cache.get(&key).await.is_none());
    }
}
