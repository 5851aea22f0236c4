use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table, keyed by the hosted identity id
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string(Users::Id).primary_key())
                    .col(string(Users::Email))
                    .col(string_null(Users::DisplayName))
                    .col(date_time(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create user_preferences table
        manager
            .create_table(
                Table::create()
                    .table(UserPreferences::Table)
                    .if_not_exists()
                    .col(pk_auto(UserPreferences::Id))
                    .col(string(UserPreferences::UserId).unique_key())
                    .col(string_len(UserPreferences::Currency, 3).default("USD"))
                    .col(boolean(UserPreferences::ShowOnboarding).default(true))
                    .col(string_len(UserPreferences::DebtStrategy, 20).default("avalanche"))
                    .col(decimal(UserPreferences::ExtraDebtPayment).decimal_len(19, 4))
                    .col(date_time(UserPreferences::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_preferences_user")
                            .from(UserPreferences::Table, UserPreferences::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::UserId))
                    .col(string(Accounts::Name))
                    .col(string_len(Accounts::AccountType, 20))
                    .col(decimal(Accounts::Balance).decimal_len(19, 4))
                    .col(boolean(Accounts::IsPrimary).default(false))
                    .col(string_null(Accounts::Institution))
                    .col(date_time(Accounts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_user")
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::UserId))
                    .col(string(Categories::Name))
                    .col(string_len(Categories::Kind, 10))
                    .col(string_null(Categories::Color))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_user")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Category names are unique per user
        manager
            .create_index(
                Index::create()
                    .name("idx_categories_user_name")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create budget_categories table
        manager
            .create_table(
                Table::create()
                    .table(BudgetCategories::Table)
                    .if_not_exists()
                    .col(pk_auto(BudgetCategories::Id))
                    .col(string(BudgetCategories::UserId))
                    .col(string(BudgetCategories::Name))
                    .col(decimal(BudgetCategories::BudgetedAmount).decimal_len(19, 4))
                    .col(integer_null(BudgetCategories::CategoryId))
                    .col(string_null(BudgetCategories::Color))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budget_categories_user")
                            .from(BudgetCategories::Table, BudgetCategories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budget_categories_category")
                            .from(BudgetCategories::Table, BudgetCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create variable_expenses table
        manager
            .create_table(
                Table::create()
                    .table(VariableExpenses::Table)
                    .if_not_exists()
                    .col(pk_auto(VariableExpenses::Id))
                    .col(string(VariableExpenses::UserId))
                    .col(integer_null(VariableExpenses::BudgetCategoryId))
                    .col(string(VariableExpenses::Name))
                    .col(decimal(VariableExpenses::Amount).decimal_len(19, 4))
                    .col(date(VariableExpenses::Date))
                    .col(string_null(VariableExpenses::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variable_expenses_user")
                            .from(VariableExpenses::Table, VariableExpenses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variable_expenses_budget_category")
                            .from(VariableExpenses::Table, VariableExpenses::BudgetCategoryId)
                            .to(BudgetCategories::Table, BudgetCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(string(Transactions::UserId))
                    .col(integer_null(Transactions::AccountId))
                    .col(integer_null(Transactions::CategoryId))
                    .col(string(Transactions::Description))
                    .col(decimal(Transactions::Amount).decimal_len(19, 4))
                    .col(date(Transactions::Date))
                    .col(date_time(Transactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(VariableExpenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BudgetCategories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserPreferences::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserPreferences {
    Table,
    Id,
    UserId,
    Currency,
    ShowOnboarding,
    DebtStrategy,
    ExtraDebtPayment,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    AccountType,
    Balance,
    IsPrimary,
    Institution,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Color,
}

#[derive(DeriveIden)]
enum BudgetCategories {
    Table,
    Id,
    UserId,
    Name,
    BudgetedAmount,
    CategoryId,
    Color,
}

#[derive(DeriveIden)]
enum VariableExpenses {
    Table,
    Id,
    UserId,
    BudgetCategoryId,
    Name,
    Amount,
    Date,
    Notes,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    AccountId,
    CategoryId,
    Description,
    Amount,
    Date,
    CreatedAt,
}
