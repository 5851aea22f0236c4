use crate::handlers::{
    accounts::{create_account, delete_account, get_account, get_accounts, update_account},
    auth::{complete_onboarding, current_user, login, logout},
    budget_categories::{
        create_budget_category, delete_budget_category, get_budget_categories,
        get_budget_category, update_budget_category,
    },
    categories::{create_category, delete_category, get_categories, get_category, update_category},
    debts::{create_debt, delete_debt, get_debt, get_debt_plan, get_debts, update_debt},
    forecast::get_forecast,
    health::health_check,
    preferences::{get_preferences, update_preferences},
    recurring::{
        create_recurring_transaction, delete_recurring_transaction, get_recurring_transaction,
        get_recurring_transactions, update_recurring_transaction,
    },
    suggestions::{categorize_transaction, suggest_expense_categories},
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
    variable_expenses::{
        create_variable_expense, delete_variable_expense, get_variable_expense,
        get_variable_expenses, update_variable_expense,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users and preferences
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/api/v1/users/:user_id/preferences",
            get(get_preferences).put(update_preferences),
        )
        // Accounts
        .route(
            "/api/v1/users/:user_id/accounts",
            post(create_account).get(get_accounts),
        )
        .route(
            "/api/v1/users/:user_id/accounts/:account_id",
            get(get_account).put(update_account).delete(delete_account),
        )
        // Categories
        .route(
            "/api/v1/users/:user_id/categories",
            post(create_category).get(get_categories),
        )
        .route(
            "/api/v1/users/:user_id/categories/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
        // Budget categories
        .route(
            "/api/v1/users/:user_id/budget-categories",
            post(create_budget_category).get(get_budget_categories),
        )
        .route(
            "/api/v1/users/:user_id/budget-categories/:budget_category_id",
            get(get_budget_category)
                .put(update_budget_category)
                .delete(delete_budget_category),
        )
        // Variable expenses
        .route(
            "/api/v1/users/:user_id/variable-expenses",
            post(create_variable_expense).get(get_variable_expenses),
        )
        .route(
            "/api/v1/users/:user_id/variable-expenses/:expense_id",
            get(get_variable_expense)
                .put(update_variable_expense)
                .delete(delete_variable_expense),
        )
        // Debts and payoff plan
        .route(
            "/api/v1/users/:user_id/debts",
            post(create_debt).get(get_debts),
        )
        .route(
            "/api/v1/users/:user_id/debts/:debt_id",
            get(get_debt).put(update_debt).delete(delete_debt),
        )
        .route("/api/v1/users/:user_id/debt-plan", get(get_debt_plan))
        // Recurring transactions
        .route(
            "/api/v1/users/:user_id/recurring-transactions",
            post(create_recurring_transaction).get(get_recurring_transactions),
        )
        .route(
            "/api/v1/users/:user_id/recurring-transactions/:recurring_id",
            get(get_recurring_transaction)
                .put(update_recurring_transaction)
                .delete(delete_recurring_transaction),
        )
        // Transactions
        .route(
            "/api/v1/users/:user_id/transactions",
            post(create_transaction).get(get_transactions),
        )
        .route(
            "/api/v1/users/:user_id/transactions/:transaction_id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        // Forecast
        .route("/api/v1/users/:user_id/forecast", get(get_forecast))
        // Session
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(current_user))
        .route("/api/v1/auth/onboarding/complete", post(complete_onboarding))
        // Suggestions
        .route("/api/v1/ai/categorize-transaction", post(categorize_transaction))
        .route(
            "/api/v1/ai/suggest-expense-categories",
            post(suggest_expense_categories),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process global, tests build many routers.
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
