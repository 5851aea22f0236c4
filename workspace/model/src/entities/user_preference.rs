use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// Ordering heuristic used to prioritize extra debt payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PayoffStrategy {
    /// Smallest balance first.
    #[sea_orm(string_value = "snowball")]
    Snowball,
    /// Highest APR first.
    #[sea_orm(string_value = "avalanche")]
    Avalanche,
}

/// Per-user settings. At most one row per user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_preferences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: String,
    /// ISO 4217 currency code used for display.
    pub currency: String,
    /// Whether the onboarding flow should still be shown.
    #[sea_orm(default_value = "true")]
    pub show_onboarding: bool,
    pub debt_strategy: PayoffStrategy,
    /// Amount paid on top of all minimum payments each month.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub extra_debt_payment: Decimal,
    pub updated_at: NaiveDateTime,
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
