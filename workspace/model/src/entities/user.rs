use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// Represents a user of the system.
/// The primary key is the hosted identity id (the `sub` claim of the session),
/// so a row can be created straight from session claims without a profile lookup.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_preference::Entity")]
    UserPreference,
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
    #[sea_orm(has_many = "super::debt_account::Entity")]
    DebtAccount,
}

impl Related<super::user_preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPreference.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::debt_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebtAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
