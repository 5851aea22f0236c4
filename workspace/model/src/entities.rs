//! This file serves as the root for all SeaORM entity modules.
//! Every table is owned by exactly one user through its `user_id` column;
//! there are no cross-user relationships.

pub mod account;
pub mod budget_category;
pub mod category;
pub mod debt_account;
pub mod recurring_transaction;
pub mod transaction;
pub mod user;
pub mod user_preference;
pub mod variable_expense;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::budget_category::Entity as BudgetCategory;
    pub use super::category::Entity as Category;
    pub use super::debt_account::Entity as DebtAccount;
    pub use super::recurring_transaction::Entity as RecurringTransaction;
    pub use super::transaction::Entity as Transaction;
    pub use super::user::Entity as User;
    pub use super::user_preference::Entity as UserPreference;
    pub use super::variable_expense::Entity as VariableExpense;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, id: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(format!("{}@example.com", id)),
            display_name: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = insert_user(&db, "alice").await?;

        let checking = account::ActiveModel {
            user_id: Set(alice.id.clone()),
            name: Set("Everyday".to_string()),
            account_type: Set(account::AccountType::CreditCard),
            balance: Set(Decimal::new(125050, 2)),
            is_primary: Set(true),
            institution: Set(Some("First Bank".to_string())),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(checking.account_type, account::AccountType::CreditCard);
        assert_eq!(checking.balance, Decimal::new(125050, 2));

        let debt = debt_account::ActiveModel {
            user_id: Set(alice.id.clone()),
            name: Set("Car".to_string()),
            debt_type: Set(debt_account::DebtType::AutoLoan),
            balance: Set(Decimal::new(1_200_000, 2)),
            apr: Set(Decimal::new(649, 2)),
            minimum_payment: Set(Decimal::new(31_500, 2)),
            payment_day: Set(31),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(debt.debt_type, debt_account::DebtType::AutoLoan);

        let debts = alice.find_related(DebtAccount).all(&db).await?;
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].payment_day, 31);

        let recurring = recurring_transaction::ActiveModel {
            user_id: Set(alice.id.clone()),
            name: Set("Salary".to_string()),
            kind: Set(recurring_transaction::RecurringKind::Income),
            amount: Set(Decimal::new(400_000, 2)),
            frequency: Set(recurring_transaction::Frequency::Biweekly),
            start_date: Set(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            end_date: Set(None),
            category_id: Set(None),
            account_id: Set(Some(checking.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(recurring.frequency, recurring_transaction::Frequency::Biweekly);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_owned_rows() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let bob = insert_user(&db, "bob").await?;

        category::ActiveModel {
            user_id: Set(bob.id.clone()),
            name: Set("Groceries".to_string()),
            kind: Set(category::CategoryKind::Expense),
            color: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(bob.id.clone()).exec(&db).await?;

        let remaining = Category::find()
            .filter(category::Column::UserId.eq(bob.id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());
        Ok(())
    }
}
