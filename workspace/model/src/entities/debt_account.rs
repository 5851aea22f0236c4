use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// The kind of debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DebtType {
    #[sea_orm(string_value = "credit-card")]
    CreditCard,
    #[sea_orm(string_value = "student-loan")]
    StudentLoan,
    #[sea_orm(string_value = "personal-loan")]
    PersonalLoan,
    #[sea_orm(string_value = "mortgage")]
    Mortgage,
    #[sea_orm(string_value = "auto-loan")]
    AutoLoan,
    #[sea_orm(string_value = "other")]
    Other,
}

/// A debt the user is paying down.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debt_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub debt_type: DebtType,
    /// Outstanding balance.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub balance: Decimal,
    /// Annual percentage rate, e.g. `19.99` for 19.99 %.
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub apr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub minimum_payment: Decimal,
    /// Day of month the minimum payment is due, 1..=31.
    /// Clamped to the last day of shorter months when projecting.
    pub payment_day: i32,
    /// Informational only. Projections ignore it.
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
