use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use common::{
    AccountDto, AccountType, AuthOutcome, BudgetCategoryDto, BudgetForecastDto,
    CategorizeTransactionInput, CategorizeTransactionOutput, CategoryDto, CategoryKind,
    CreateAccountRequest, CreateBudgetCategoryRequest, CreateCategoryRequest,
    CreateDebtAccountRequest, CreateRecurringTransactionRequest, CreateTransactionRequest,
    CreateUserRequest, CreateVariableExpenseRequest, CurrentUserDto, DebtAccountDto,
    DebtPayoffDto, DebtPlanDto, DebtStrategy, DebtType, ForecastTotalsDto, Frequency,
    LoginRequest, MonthForecastDto, OnboardingOutcome, PreferencesDto, RecurringKind,
    RecurringTransactionDto, SuggestExpenseCategoriesInput, SuggestExpenseCategoriesOutput,
    TransactionDto, UpdateAccountRequest, UpdateBudgetCategoryRequest, UpdateCategoryRequest,
    UpdateDebtAccountRequest, UpdatePreferencesRequest, UpdateRecurringTransactionRequest,
    UpdateTransactionRequest, UpdateUserRequest, UpdateVariableExpenseRequest, UserDto,
    VariableExpenseDto,
};
use moka::future::Cache;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::ai::PromptModel;
use crate::session::SessionContext;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
    /// Signed in user state, absent when no auth provider is configured
    pub session: Option<Arc<SessionContext>>,
    /// Suggestion model, absent when not configured
    pub ai: Option<Arc<dyn PromptModel>>,
    /// Bumped by every write that can change a forecast
    pub forecast_generation: Arc<AtomicU64>,
}

impl AppState {
    /// Drops every cached forecast after a write that affects them.
    pub fn invalidate_forecasts(&self) {
        self.forecast_generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
    }

    pub fn forecast_generation(&self) -> u64 {
        self.forecast_generation.load(Ordering::Acquire)
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Forecast(BudgetForecastDto),
}

/// Cache key of the forecast of one user and year.
pub fn forecast_cache_key(user_id: &str, year: i32) -> String {
    format!("forecast:{}:{}", user_id, year)
}

/// Query parameters of the forecast endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    /// Forecast year (defaults to the current year)
    #[validate(range(min = 1900, max = 9999))]
    pub year: Option<i32>,
}

/// Query parameters of the debt plan endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DebtPlanQuery {
    /// Overrides the strategy stored in the user's preferences
    pub strategy: Option<DebtStrategy>,
    /// Overrides the extra monthly payment stored in the user's preferences
    #[validate(custom(function = "common::patch::non_negative"))]
    pub extra_payment: Option<Decimal>,
    /// First simulated month, any day inside it (defaults to the current month)
    pub start: Option<NaiveDate>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::preferences::get_preferences,
        crate::handlers::preferences::update_preferences,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::budget_categories::create_budget_category,
        crate::handlers::budget_categories::get_budget_categories,
        crate::handlers::budget_categories::get_budget_category,
        crate::handlers::budget_categories::update_budget_category,
        crate::handlers::budget_categories::delete_budget_category,
        crate::handlers::variable_expenses::create_variable_expense,
        crate::handlers::variable_expenses::get_variable_expenses,
        crate::handlers::variable_expenses::get_variable_expense,
        crate::handlers::variable_expenses::update_variable_expense,
        crate::handlers::variable_expenses::delete_variable_expense,
        crate::handlers::debts::create_debt,
        crate::handlers::debts::get_debts,
        crate::handlers::debts::get_debt,
        crate::handlers::debts::update_debt,
        crate::handlers::debts::delete_debt,
        crate::handlers::debts::get_debt_plan,
        crate::handlers::recurring::create_recurring_transaction,
        crate::handlers::recurring::get_recurring_transactions,
        crate::handlers::recurring::get_recurring_transaction,
        crate::handlers::recurring::update_recurring_transaction,
        crate::handlers::recurring::delete_recurring_transaction,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::forecast::get_forecast,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::current_user,
        crate::handlers::auth::complete_onboarding,
        crate::handlers::suggestions::categorize_transaction,
        crate::handlers::suggestions::suggest_expense_categories,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ForecastQuery,
            DebtPlanQuery,
            UserDto,
            CreateUserRequest,
            UpdateUserRequest,
            PreferencesDto,
            UpdatePreferencesRequest,
            DebtStrategy,
            AccountDto,
            AccountType,
            CreateAccountRequest,
            UpdateAccountRequest,
            CategoryDto,
            CategoryKind,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            BudgetCategoryDto,
            CreateBudgetCategoryRequest,
            UpdateBudgetCategoryRequest,
            VariableExpenseDto,
            CreateVariableExpenseRequest,
            UpdateVariableExpenseRequest,
            DebtAccountDto,
            DebtType,
            CreateDebtAccountRequest,
            UpdateDebtAccountRequest,
            DebtPlanDto,
            DebtPayoffDto,
            RecurringTransactionDto,
            RecurringKind,
            Frequency,
            CreateRecurringTransactionRequest,
            UpdateRecurringTransactionRequest,
            TransactionDto,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            BudgetForecastDto,
            MonthForecastDto,
            ForecastTotalsDto,
            LoginRequest,
            AuthOutcome,
            CurrentUserDto,
            OnboardingOutcome,
            CategorizeTransactionInput,
            CategorizeTransactionOutput,
            SuggestExpenseCategoriesInput,
            SuggestExpenseCategoriesOutput,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User and preference endpoints"),
        (name = "accounts", description = "Bank account endpoints"),
        (name = "categories", description = "Income and expense category endpoints"),
        (name = "budget-categories", description = "Monthly budget category endpoints"),
        (name = "variable-expenses", description = "Variable expense endpoints"),
        (name = "debts", description = "Debt account and payoff plan endpoints"),
        (name = "recurring-transactions", description = "Recurring income and fixed expense endpoints"),
        (name = "transactions", description = "Transaction endpoints"),
        (name = "forecast", description = "Yearly budget forecast endpoints"),
        (name = "auth", description = "Session endpoints"),
        (name = "ai", description = "Categorization suggestion endpoints"),
    ),
    info(
        title = "Pocket Ledger API",
        description = "Personal finance backend: accounts, budgets, debts, recurring transactions and forecasts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
