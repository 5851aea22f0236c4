use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{category, user};

/// A monthly spending envelope, optionally tied to a transaction category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub name: String,
    /// Amount budgeted for every month.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub budgeted_amount: Decimal,
    pub category_id: Option<i32>,
    pub color: Option<String>,
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
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::variable_expense::Entity")]
    VariableExpense,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::variable_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariableExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
