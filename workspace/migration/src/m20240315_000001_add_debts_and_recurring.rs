use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_table::{Accounts, Categories, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DebtAccounts::Table)
                    .if_not_exists()
                    .col(pk_auto(DebtAccounts::Id))
                    .col(string(DebtAccounts::UserId))
                    .col(string(DebtAccounts::Name))
                    .col(string_len(DebtAccounts::DebtType, 20))
                    .col(decimal(DebtAccounts::Balance).decimal_len(19, 4))
                    .col(decimal(DebtAccounts::Apr).decimal_len(9, 4))
                    .col(decimal(DebtAccounts::MinimumPayment).decimal_len(19, 4))
                    .col(integer(DebtAccounts::PaymentDay))
                    .col(date_time(DebtAccounts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_debt_accounts_user")
                            .from(DebtAccounts::Table, DebtAccounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(RecurringTransactions::Id))
                    .col(string(RecurringTransactions::UserId))
                    .col(string(RecurringTransactions::Name))
                    .col(string_len(RecurringTransactions::Kind, 10))
                    .col(decimal(RecurringTransactions::Amount).decimal_len(19, 4))
                    .col(string_len(RecurringTransactions::Frequency, 10))
                    .col(date(RecurringTransactions::StartDate))
                    .col(date_null(RecurringTransactions::EndDate))
                    .col(integer_null(RecurringTransactions::CategoryId))
                    .col(integer_null(RecurringTransactions::AccountId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_user")
                            .from(RecurringTransactions::Table, RecurringTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_category")
                            .from(RecurringTransactions::Table, RecurringTransactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_account")
                            .from(RecurringTransactions::Table, RecurringTransactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DebtAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DebtAccounts {
    Table,
    Id,
    UserId,
    Name,
    DebtType,
    Balance,
    Apr,
    MinimumPayment,
    PaymentDay,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecurringTransactions {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Amount,
    Frequency,
    StartDate,
    EndDate,
    CategoryId,
    AccountId,
}
