use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::Utc;
use common::{CreateDebtAccountRequest, DebtAccountDto, DebtPlanDto, UpdateDebtAccountRequest};
use compute::simulate_payoff;
use tracing::{debug, info, instrument, trace};

use crate::helpers::converters::plan_to_dto;
use crate::helpers::errors::{compute_error, ApiError};
use crate::schemas::{ApiResponse, AppState, DebtPlanQuery, ErrorResponse};
use crate::store::mapper::strategy_to_row;
use crate::store::{debt_accounts, preferences};

/// Create a debt
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/debts",
    tag = "debts",
    params(("user_id" = String, Path, description = "Owner user ID")),
    request_body = CreateDebtAccountRequest,
    responses(
        (status = 201, description = "Debt created successfully", body = ApiResponse<DebtAccountDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_debt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Json(request)): Valid<Json<CreateDebtAccountRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<DebtAccountDto>>), ApiError> {
    trace!("Entering create_debt function");
    let created = debt_accounts::create(&state.db, &user_id, request).await?;
    state.invalidate_forecasts();
    info!("Debt {} created for user {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(created, "Debt created successfully")),
    ))
}

/// List the debts of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/debts",
    tag = "debts",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Debts retrieved successfully", body = ApiResponse<Vec<DebtAccountDto>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_debts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<DebtAccountDto>>>, ApiError> {
    trace!("Entering get_debts function");
    let items = debt_accounts::list(&state.db, &user_id).await?;
    debug!("Returning {} debts", items.len());
    Ok(Json(ApiResponse::new(items, "Debts retrieved successfully")))
}

/// Get a debt by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/debts/{debt_id}",
    tag = "debts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("debt_id" = i32, Path, description = "Debt ID"),
    ),
    responses(
        (status = 200, description = "Debt retrieved successfully", body = ApiResponse<DebtAccountDto>),
        (status = 404, description = "Debt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_debt(
    State(state): State<AppState>,
    Path((user_id, debt_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<DebtAccountDto>>, ApiError> {
    trace!("Entering get_debt function");
    let item = debt_accounts::get(&state.db, &user_id, debt_id).await?;
    Ok(Json(ApiResponse::new(item, "Debt retrieved successfully")))
}

/// Update a debt; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/debts/{debt_id}",
    tag = "debts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("debt_id" = i32, Path, description = "Debt ID"),
    ),
    request_body = UpdateDebtAccountRequest,
    responses(
        (status = 200, description = "Debt updated successfully", body = ApiResponse<DebtAccountDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Debt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_debt(
    State(state): State<AppState>,
    Path((user_id, debt_id)): Path<(String, i32)>,
    Valid(Json(request)): Valid<Json<UpdateDebtAccountRequest>>,
) -> Result<Json<ApiResponse<DebtAccountDto>>, ApiError> {
    trace!("Entering update_debt function");
    let updated = debt_accounts::update(&state.db, &user_id, debt_id, request).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(updated, "Debt updated successfully")))
}

/// Delete a debt
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/debts/{debt_id}",
    tag = "debts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        ("debt_id" = i32, Path, description = "Debt ID"),
    ),
    responses(
        (status = 200, description = "Debt deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Debt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_debt(
    State(state): State<AppState>,
    Path((user_id, debt_id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_debt function");
    debt_accounts::delete(&state.db, &user_id, debt_id).await?;
    state.invalidate_forecasts();
    Ok(Json(ApiResponse::new(
        format!("Debt {} deleted", debt_id),
        "Debt deleted successfully",
    )))
}

/// Payoff plan of all debts of a user
///
/// Strategy and extra payment come from the user's preferences unless
/// overridden by the query.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/debt-plan",
    tag = "debts",
    params(
        ("user_id" = String, Path, description = "Owner user ID"),
        DebtPlanQuery,
    ),
    responses(
        (status = 200, description = "Debt plan computed successfully", body = ApiResponse<DebtPlanDto>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Payments never pay the debts off", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_debt_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Valid(Query(query)): Valid<Query<DebtPlanQuery>>,
) -> Result<Json<ApiResponse<DebtPlanDto>>, ApiError> {
    trace!("Entering get_debt_plan function");
    let prefs = preferences::get_or_default(&state.db, &user_id).await?;
    let debts = debt_accounts::list_models(&state.db, &user_id).await?;

    let strategy = query.strategy.unwrap_or(prefs.debt_strategy);
    let extra_payment = query.extra_payment.unwrap_or(prefs.extra_debt_payment);
    let start = query.start.unwrap_or_else(|| Utc::now().date_naive());
    debug!(
        "Planning {} debts with {:?} and extra payment {} from {}",
        debts.len(),
        strategy,
        extra_payment,
        start
    );

    let plan = simulate_payoff(&debts, strategy_to_row(strategy), extra_payment, start).map_err(compute_error)?;
    info!(
        "User {} is debt free after {} months",
        user_id, plan.months_to_debt_free
    );
    Ok(Json(ApiResponse::new(
        plan_to_dto(&user_id, &debts, plan),
        "Debt plan computed successfully",
    )))
}
