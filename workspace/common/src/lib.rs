//! Transport types shared by the HTTP handlers, the data-access layer and
//! the suggestion flows. JSON field names are camelCase.

mod accounts;
mod ai;
mod auth;
mod budgeting;
mod debts;
mod forecast;
pub mod patch;
mod recurring;
mod transactions;
mod users;

pub use accounts::{AccountDto, AccountType, CreateAccountRequest, UpdateAccountRequest};
pub use ai::{
    CategorizeTransactionInput, CategorizeTransactionOutput, SuggestExpenseCategoriesInput,
    SuggestExpenseCategoriesOutput, MAX_SUGGESTED_CATEGORIES,
};
pub use auth::{AuthOutcome, CurrentUserDto, LoginRequest, OnboardingOutcome};
pub use budgeting::{
    BudgetCategoryDto, CategoryDto, CategoryKind, CreateBudgetCategoryRequest,
    CreateCategoryRequest, CreateVariableExpenseRequest, UpdateBudgetCategoryRequest,
    UpdateCategoryRequest, UpdateVariableExpenseRequest, VariableExpenseDto,
};
pub use debts::{
    CreateDebtAccountRequest, DebtAccountDto, DebtPayoffDto, DebtPlanDto, DebtType,
    UpdateDebtAccountRequest,
};
pub use forecast::{BudgetForecastDto, ForecastTotalsDto, MonthForecastDto};
pub use recurring::{
    CreateRecurringTransactionRequest, Frequency, RecurringKind, RecurringTransactionDto,
    UpdateRecurringTransactionRequest,
};
pub use transactions::{CreateTransactionRequest, TransactionDto, UpdateTransactionRequest};
pub use users::{
    CreateUserRequest, DebtStrategy, PreferencesDto, UpdatePreferencesRequest, UpdateUserRequest,
    UserDto,
};
