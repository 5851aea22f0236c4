//! Typed translation between application objects (camelCase transport types)
//! and persisted rows (SeaORM models), one implementation per entity.

use chrono::Utc;
use common::{
    AccountDto, AccountType, BudgetCategoryDto, CategoryDto, CategoryKind,
    CreateAccountRequest, CreateBudgetCategoryRequest, CreateCategoryRequest,
    CreateDebtAccountRequest, CreateRecurringTransactionRequest, CreateTransactionRequest,
    CreateUserRequest, CreateVariableExpenseRequest, DebtAccountDto, DebtStrategy, DebtType,
    Frequency, PreferencesDto, RecurringKind, RecurringTransactionDto, TransactionDto,
    UpdateAccountRequest, UpdateBudgetCategoryRequest, UpdateCategoryRequest,
    UpdateDebtAccountRequest, UpdatePreferencesRequest, UpdateRecurringTransactionRequest,
    UpdateTransactionRequest, UpdateUserRequest, UpdateVariableExpenseRequest, UserDto,
    VariableExpenseDto,
};
use model::entities::{
    account, budget_category, category, debt_account, recurring_transaction, transaction, user,
    user_preference, variable_expense,
};
use rust_decimal::Decimal;
use sea_orm::Set;

/// Bidirectional mapping between a row and its application object.
pub trait EntityMapper: Sized {
    type Model;
    type ActiveModel;
    type Create;
    type Patch;

    /// Human readable entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Row to application object.
    fn from_model(model: Self::Model) -> Self;

    /// Create request to an insertable row owned by `user_id`.
    fn new_active_model(user_id: &str, request: Self::Create) -> Self::ActiveModel;

    /// Writes the fields present in `patch`, returning a description of each change.
    fn apply_patch(active: &mut Self::ActiveModel, patch: Self::Patch) -> Vec<String>;
}

// ===================== Enum translation =====================

pub fn account_type_to_row(value: AccountType) -> account::AccountType {
    match value {
        AccountType::Checking => account::AccountType::Checking,
        AccountType::Savings => account::AccountType::Savings,
        AccountType::CreditCard => account::AccountType::CreditCard,
        AccountType::Other => account::AccountType::Other,
    }
}

pub fn account_type_from_row(value: account::AccountType) -> AccountType {
    match value {
        account::AccountType::Checking => AccountType::Checking,
        account::AccountType::Savings => AccountType::Savings,
        account::AccountType::CreditCard => AccountType::CreditCard,
        account::AccountType::Other => AccountType::Other,
    }
}

pub fn category_kind_to_row(value: CategoryKind) -> category::CategoryKind {
    match value {
        CategoryKind::Income => category::CategoryKind::Income,
        CategoryKind::Expense => category::CategoryKind::Expense,
    }
}

pub fn category_kind_from_row(value: category::CategoryKind) -> CategoryKind {
    match value {
        category::CategoryKind::Income => CategoryKind::Income,
        category::CategoryKind::Expense => CategoryKind::Expense,
    }
}

pub fn debt_type_to_row(value: DebtType) -> debt_account::DebtType {
    match value {
        DebtType::CreditCard => debt_account::DebtType::CreditCard,
        DebtType::StudentLoan => debt_account::DebtType::StudentLoan,
        DebtType::PersonalLoan => debt_account::DebtType::PersonalLoan,
        DebtType::Mortgage => debt_account::DebtType::Mortgage,
        DebtType::AutoLoan => debt_account::DebtType::AutoLoan,
        DebtType::Other => debt_account::DebtType::Other,
    }
}

pub fn debt_type_from_row(value: debt_account::DebtType) -> DebtType {
    match value {
        debt_account::DebtType::CreditCard => DebtType::CreditCard,
        debt_account::DebtType::StudentLoan => DebtType::StudentLoan,
        debt_account::DebtType::PersonalLoan => DebtType::PersonalLoan,
        debt_account::DebtType::Mortgage => DebtType::Mortgage,
        debt_account::DebtType::AutoLoan => DebtType::AutoLoan,
        debt_account::DebtType::Other => DebtType::Other,
    }
}

pub fn strategy_to_row(value: DebtStrategy) -> user_preference::PayoffStrategy {
    match value {
        DebtStrategy::Snowball => user_preference::PayoffStrategy::Snowball,
        DebtStrategy::Avalanche => user_preference::PayoffStrategy::Avalanche,
    }
}

pub fn strategy_from_row(value: user_preference::PayoffStrategy) -> DebtStrategy {
    match value {
        user_preference::PayoffStrategy::Snowball => DebtStrategy::Snowball,
        user_preference::PayoffStrategy::Avalanche => DebtStrategy::Avalanche,
    }
}

pub fn recurring_kind_to_row(value: RecurringKind) -> recurring_transaction::RecurringKind {
    match value {
        RecurringKind::Income => recurring_transaction::RecurringKind::Income,
        RecurringKind::Expense => recurring_transaction::RecurringKind::Expense,
    }
}

pub fn recurring_kind_from_row(value: recurring_transaction::RecurringKind) -> RecurringKind {
    match value {
        recurring_transaction::RecurringKind::Income => RecurringKind::Income,
        recurring_transaction::RecurringKind::Expense => RecurringKind::Expense,
    }
}

pub fn frequency_to_row(value: Frequency) -> recurring_transaction::Frequency {
    match value {
        Frequency::Weekly => recurring_transaction::Frequency::Weekly,
        Frequency::Biweekly => recurring_transaction::Frequency::Biweekly,
        Frequency::Monthly => recurring_transaction::Frequency::Monthly,
        Frequency::Quarterly => recurring_transaction::Frequency::Quarterly,
        Frequency::Yearly => recurring_transaction::Frequency::Yearly,
    }
}

pub fn frequency_from_row(value: recurring_transaction::Frequency) -> Frequency {
    match value {
        recurring_transaction::Frequency::Weekly => Frequency::Weekly,
        recurring_transaction::Frequency::Biweekly => Frequency::Biweekly,
        recurring_transaction::Frequency::Monthly => Frequency::Monthly,
        recurring_transaction::Frequency::Quarterly => Frequency::Quarterly,
        recurring_transaction::Frequency::Yearly => Frequency::Yearly,
    }
}

// ===================== Users =====================

impl EntityMapper for UserDto {
    type Model = user::Model;
    type ActiveModel = user::ActiveModel;
    type Create = CreateUserRequest;
    type Patch = UpdateUserRequest;
    const ENTITY: &'static str = "user";

    fn from_model(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            created_at: model.created_at,
        }
    }

    /// Users own themselves: the id comes from the request.
    fn new_active_model(_user_id: &str, request: CreateUserRequest) -> user::ActiveModel {
        user::ActiveModel {
            id: Set(request.id),
            email: Set(request.email),
            display_name: Set(request.display_name),
            created_at: Set(Utc::now().naive_utc()),
        }
    }

    fn apply_patch(active: &mut user::ActiveModel, patch: UpdateUserRequest) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(email) = patch.email {
            updated_fields.push(format!("email: {}", email));
            active.email = Set(email);
        }
        if let Some(display_name) = patch.display_name {
            updated_fields.push(format!("display_name: {:?}", display_name));
            active.display_name = Set(display_name);
        }
        updated_fields
    }
}

// ===================== Preferences =====================

pub const DEFAULT_CURRENCY: &str = "USD";

/// Preferences of a user who never saved any.
pub fn default_preferences(user_id: &str) -> PreferencesDto {
    PreferencesDto {
        user_id: user_id.to_string(),
        currency: DEFAULT_CURRENCY.to_string(),
        show_onboarding: true,
        debt_strategy: DebtStrategy::default(),
        extra_debt_payment: Decimal::ZERO,
        updated_at: None,
    }
}

impl EntityMapper for PreferencesDto {
    type Model = user_preference::Model;
    type ActiveModel = user_preference::ActiveModel;
    type Create = ();
    type Patch = UpdatePreferencesRequest;
    const ENTITY: &'static str = "preferences";

    fn from_model(model: user_preference::Model) -> Self {
        Self {
            user_id: model.user_id,
            currency: model.currency,
            show_onboarding: model.show_onboarding,
            debt_strategy: strategy_from_row(model.debt_strategy),
            extra_debt_payment: model.extra_debt_payment,
            updated_at: Some(model.updated_at),
        }
    }

    /// A row holding the defaults.
    fn new_active_model(user_id: &str, _request: ()) -> user_preference::ActiveModel {
        let defaults = default_preferences(user_id);
        user_preference::ActiveModel {
            user_id: Set(defaults.user_id),
            currency: Set(defaults.currency),
            show_onboarding: Set(defaults.show_onboarding),
            debt_strategy: Set(strategy_to_row(defaults.debt_strategy)),
            extra_debt_payment: Set(defaults.extra_debt_payment),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
    }

    fn apply_patch(
        active: &mut user_preference::ActiveModel,
        patch: UpdatePreferencesRequest,
    ) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(currency) = patch.currency {
            updated_fields.push(format!("currency: {}", currency));
            active.currency = Set(currency);
        }
        if let Some(show_onboarding) = patch.show_onboarding {
            updated_fields.push(format!("show_onboarding: {}", show_onboarding));
            active.show_onboarding = Set(show_onboarding);
        }
        if let Some(strategy) = patch.debt_strategy {
            updated_fields.push(format!("debt_strategy: {:?}", strategy));
            active.debt_strategy = Set(strategy_to_row(strategy));
        }
        if let Some(extra) = patch.extra_debt_payment {
            updated_fields.push(format!("extra_debt_payment: {}", extra));
            active.extra_debt_payment = Set(extra);
        }
        if !updated_fields.is_empty() {
            active.updated_at = Set(Utc::now().naive_utc());
        }
        updated_fields
    }
}

// ===================== Accounts =====================

impl EntityMapper for AccountDto {
    type Model = account::Model;
    type ActiveModel = account::ActiveModel;
    type Create = CreateAccountRequest;
    type Patch = UpdateAccountRequest;
    const ENTITY: &'static str = "account";

    fn from_model(model: account::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            account_type: account_type_from_row(model.account_type),
            balance: model.balance,
            is_primary: model.is_primary,
            institution: model.institution,
            created_at: model.created_at,
        }
    }

    fn new_active_model(user_id: &str, request: CreateAccountRequest) -> account::ActiveModel {
        account::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(request.name),
            account_type: Set(account_type_to_row(request.account_type)),
            balance: Set(request.balance),
            is_primary: Set(request.is_primary),
            institution: Set(request.institution),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
    }

    fn apply_patch(active: &mut account::ActiveModel, patch: UpdateAccountRequest) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(account_type) = patch.account_type {
            updated_fields.push(format!("type: {:?}", account_type));
            active.account_type = Set(account_type_to_row(account_type));
        }
        if let Some(balance) = patch.balance {
            updated_fields.push(format!("balance: {}", balance));
            active.balance = Set(balance);
        }
        if let Some(is_primary) = patch.is_primary {
            updated_fields.push(format!("is_primary: {}", is_primary));
            active.is_primary = Set(is_primary);
        }
        if let Some(institution) = patch.institution {
            updated_fields.push(format!("institution: {:?}", institution));
            active.institution = Set(institution);
        }
        updated_fields
    }
}

// ===================== Categories =====================

impl EntityMapper for CategoryDto {
    type Model = category::Model;
    type ActiveModel = category::ActiveModel;
    type Create = CreateCategoryRequest;
    type Patch = UpdateCategoryRequest;
    const ENTITY: &'static str = "category";

    fn from_model(model: category::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: category_kind_from_row(model.kind),
            color: model.color,
        }
    }

    fn new_active_model(user_id: &str, request: CreateCategoryRequest) -> category::ActiveModel {
        category::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(request.name),
            kind: Set(category_kind_to_row(request.kind)),
            color: Set(request.color),
            ..Default::default()
        }
    }

    fn apply_patch(active: &mut category::ActiveModel, patch: UpdateCategoryRequest) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(kind) = patch.kind {
            updated_fields.push(format!("kind: {:?}", kind));
            active.kind = Set(category_kind_to_row(kind));
        }
        if let Some(color) = patch.color {
            updated_fields.push(format!("color: {:?}", color));
            active.color = Set(color);
        }
        updated_fields
    }
}

// ===================== Budget categories =====================

impl EntityMapper for BudgetCategoryDto {
    type Model = budget_category::Model;
    type ActiveModel = budget_category::ActiveModel;
    type Create = CreateBudgetCategoryRequest;
    type Patch = UpdateBudgetCategoryRequest;
    const ENTITY: &'static str = "budget category";

    fn from_model(model: budget_category::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            budgeted_amount: model.budgeted_amount,
            category_id: model.category_id,
            color: model.color,
        }
    }

    fn new_active_model(
        user_id: &str,
        request: CreateBudgetCategoryRequest,
    ) -> budget_category::ActiveModel {
        budget_category::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(request.name),
            budgeted_amount: Set(request.budgeted_amount),
            category_id: Set(request.category_id),
            color: Set(request.color),
            ..Default::default()
        }
    }

    fn apply_patch(
        active: &mut budget_category::ActiveModel,
        patch: UpdateBudgetCategoryRequest,
    ) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(amount) = patch.budgeted_amount {
            updated_fields.push(format!("budgeted_amount: {}", amount));
            active.budgeted_amount = Set(amount);
        }
        if let Some(category_id) = patch.category_id {
            updated_fields.push(format!("category_id: {:?}", category_id));
            active.category_id = Set(category_id);
        }
        if let Some(color) = patch.color {
            updated_fields.push(format!("color: {:?}", color));
            active.color = Set(color);
        }
        updated_fields
    }
}

// ===================== Variable expenses =====================

impl EntityMapper for VariableExpenseDto {
    type Model = variable_expense::Model;
    type ActiveModel = variable_expense::ActiveModel;
    type Create = CreateVariableExpenseRequest;
    type Patch = UpdateVariableExpenseRequest;
    const ENTITY: &'static str = "variable expense";

    fn from_model(model: variable_expense::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            budget_category_id: model.budget_category_id,
            name: model.name,
            amount: model.amount,
            date: model.date,
            notes: model.notes,
        }
    }

    fn new_active_model(
        user_id: &str,
        request: CreateVariableExpenseRequest,
    ) -> variable_expense::ActiveModel {
        variable_expense::ActiveModel {
            user_id: Set(user_id.to_string()),
            budget_category_id: Set(request.budget_category_id),
            name: Set(request.name),
            amount: Set(request.amount),
            date: Set(request.date),
            notes: Set(request.notes),
            ..Default::default()
        }
    }

    fn apply_patch(
        active: &mut variable_expense::ActiveModel,
        patch: UpdateVariableExpenseRequest,
    ) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(budget_category_id) = patch.budget_category_id {
            updated_fields.push(format!("budget_category_id: {:?}", budget_category_id));
            active.budget_category_id = Set(budget_category_id);
        }
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(amount) = patch.amount {
            updated_fields.push(format!("amount: {}", amount));
            active.amount = Set(amount);
        }
        if let Some(date) = patch.date {
            updated_fields.push(format!("date: {}", date));
            active.date = Set(date);
        }
        if let Some(notes) = patch.notes {
            updated_fields.push("notes".to_string());
            active.notes = Set(notes);
        }
        updated_fields
    }
}

// ===================== Debt accounts =====================

impl EntityMapper for DebtAccountDto {
    type Model = debt_account::Model;
    type ActiveModel = debt_account::ActiveModel;
    type Create = CreateDebtAccountRequest;
    type Patch = UpdateDebtAccountRequest;
    const ENTITY: &'static str = "debt";

    fn from_model(model: debt_account::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            debt_type: debt_type_from_row(model.debt_type),
            balance: model.balance,
            apr: model.apr,
            minimum_payment: model.minimum_payment,
            payment_day: model.payment_day,
            created_at: model.created_at,
        }
    }

    fn new_active_model(user_id: &str, request: CreateDebtAccountRequest) -> debt_account::ActiveModel {
        debt_account::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(request.name),
            debt_type: Set(debt_type_to_row(request.debt_type)),
            balance: Set(request.balance),
            apr: Set(request.apr),
            minimum_payment: Set(request.minimum_payment),
            payment_day: Set(request.payment_day),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
    }

    fn apply_patch(active: &mut debt_account::ActiveModel, patch: UpdateDebtAccountRequest) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(debt_type) = patch.debt_type {
            updated_fields.push(format!("type: {:?}", debt_type));
            active.debt_type = Set(debt_type_to_row(debt_type));
        }
        if let Some(balance) = patch.balance {
            updated_fields.push(format!("balance: {}", balance));
            active.balance = Set(balance);
        }
        if let Some(apr) = patch.apr {
            updated_fields.push(format!("apr: {}", apr));
            active.apr = Set(apr);
        }
        if let Some(minimum_payment) = patch.minimum_payment {
            updated_fields.push(format!("minimum_payment: {}", minimum_payment));
            active.minimum_payment = Set(minimum_payment);
        }
        if let Some(payment_day) = patch.payment_day {
            updated_fields.push(format!("payment_day: {}", payment_day));
            active.payment_day = Set(payment_day);
        }
        updated_fields
    }
}

// ===================== Recurring transactions =====================

impl EntityMapper for RecurringTransactionDto {
    type Model = recurring_transaction::Model;
    type ActiveModel = recurring_transaction::ActiveModel;
    type Create = CreateRecurringTransactionRequest;
    type Patch = UpdateRecurringTransactionRequest;
    const ENTITY: &'static str = "recurring transaction";

    fn from_model(model: recurring_transaction::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: recurring_kind_from_row(model.kind),
            amount: model.amount,
            frequency: frequency_from_row(model.frequency),
            start_date: model.start_date,
            end_date: model.end_date,
            category_id: model.category_id,
            account_id: model.account_id,
        }
    }

    fn new_active_model(
        user_id: &str,
        request: CreateRecurringTransactionRequest,
    ) -> recurring_transaction::ActiveModel {
        recurring_transaction::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(request.name),
            kind: Set(recurring_kind_to_row(request.kind)),
            amount: Set(request.amount),
            frequency: Set(frequency_to_row(request.frequency)),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            category_id: Set(request.category_id),
            account_id: Set(request.account_id),
            ..Default::default()
        }
    }

    fn apply_patch(
        active: &mut recurring_transaction::ActiveModel,
        patch: UpdateRecurringTransactionRequest,
    ) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(name) = patch.name {
            updated_fields.push(format!("name: {}", name));
            active.name = Set(name);
        }
        if let Some(kind) = patch.kind {
            updated_fields.push(format!("kind: {:?}", kind));
            active.kind = Set(recurring_kind_to_row(kind));
        }
        if let Some(amount) = patch.amount {
            updated_fields.push(format!("amount: {}", amount));
            active.amount = Set(amount);
        }
        if let Some(frequency) = patch.frequency {
            updated_fields.push(format!("frequency: {:?}", frequency));
            active.frequency = Set(frequency_to_row(frequency));
        }
        if let Some(start_date) = patch.start_date {
            updated_fields.push(format!("start_date: {}", start_date));
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = patch.end_date {
            updated_fields.push(format!("end_date: {:?}", end_date));
            active.end_date = Set(end_date);
        }
        if let Some(category_id) = patch.category_id {
            updated_fields.push(format!("category_id: {:?}", category_id));
            active.category_id = Set(category_id);
        }
        if let Some(account_id) = patch.account_id {
            updated_fields.push(format!("account_id: {:?}", account_id));
            active.account_id = Set(account_id);
        }
        updated_fields
    }
}

// ===================== Transactions =====================

impl EntityMapper for TransactionDto {
    type Model = transaction::Model;
    type ActiveModel = transaction::ActiveModel;
    type Create = CreateTransactionRequest;
    type Patch = UpdateTransactionRequest;
    const ENTITY: &'static str = "transaction";

    fn from_model(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            category_id: model.category_id,
            description: model.description,
            amount: model.amount,
            date: model.date,
            created_at: model.created_at,
        }
    }

    fn new_active_model(user_id: &str, request: CreateTransactionRequest) -> transaction::ActiveModel {
        transaction::ActiveModel {
            user_id: Set(user_id.to_string()),
            account_id: Set(request.account_id),
            category_id: Set(request.category_id),
            description: Set(request.description),
            amount: Set(request.amount),
            date: Set(request.date),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
    }

    fn apply_patch(active: &mut transaction::ActiveModel, patch: UpdateTransactionRequest) -> Vec<String> {
        let mut updated_fields = Vec::new();
        if let Some(account_id) = patch.account_id {
            updated_fields.push(format!("account_id: {:?}", account_id));
            active.account_id = Set(account_id);
        }
        if let Some(category_id) = patch.category_id {
            updated_fields.push(format!("category_id: {:?}", category_id));
            active.category_id = Set(category_id);
        }
        if let Some(description) = patch.description {
            updated_fields.push(format!("description: {}", description));
            active.description = Set(description);
        }
        if let Some(amount) = patch.amount {
            updated_fields.push(format!("amount: {}", amount));
            active.amount = Set(amount);
        }
        if let Some(date) = patch.date {
            updated_fields.push(format!("date: {}", date));
            active.date = Set(date);
        }
        updated_fields
    }
}
