use common::{AccountDto, CreateAccountRequest, UpdateAccountRequest};
use model::entities::account;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, info, trace, warn};

use super::users::require_user;
use super::{EntityMapper, StoreError, StoreResult};

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    account_id: i32,
) -> StoreResult<account::Model> {
    account::Entity::find_by_id(account_id)
        .filter(account::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Account with ID {} not found for user {}", account_id, user_id);
            StoreError::not_found(AccountDto::ENTITY, account_id)
        })
}

/// Fails with `Validation` unless the account exists and belongs to the user.
pub async fn require_reference(db: &DatabaseConnection, user_id: &str, account_id: i32) -> StoreResult<()> {
    find_owned(db, user_id, account_id)
        .await
        .map(|_| ())
        .map_err(|err| match err {
            StoreError::NotFound { .. } => {
                StoreError::Validation(format!("account {} does not exist", account_id))
            }
            other => other,
        })
}

/// Clears the primary flag on every other account of the user.
async fn clear_primary<C: ConnectionTrait>(db: &C, user_id: &str, keep_id: Option<i32>) -> StoreResult<()> {
    let mut query = account::Entity::update_many()
        .col_expr(account::Column::IsPrimary, Expr::value(false))
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::IsPrimary.eq(true));
    if let Some(id) = keep_id {
        query = query.filter(account::Column::Id.ne(id));
    }
    let result = query.exec(db).await?;
    trace!("Cleared primary flag on {} accounts of user {}", result.rows_affected, user_id);
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateAccountRequest,
) -> StoreResult<AccountDto> {
    require_user(db, user_id).await?;
    debug!("Creating account '{}' for user {}", request.name, user_id);

    let txn = db.begin().await?;
    let is_primary = request.is_primary;
    let model = AccountDto::new_active_model(user_id, request).insert(&txn).await?;
    if is_primary {
        clear_primary(&txn, user_id, Some(model.id)).await?;
    }
    txn.commit().await?;

    info!("Account created successfully with ID: {}, name: {}", model.id, model.name);
    Ok(AccountDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, account_id: i32) -> StoreResult<AccountDto> {
    find_owned(db, user_id, account_id).await.map(AccountDto::from_model)
}

/// Accounts of the user, primary first, then by name and id.
pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<AccountDto>> {
    require_user(db, user_id).await?;
    let accounts = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .order_by_desc(account::Column::IsPrimary)
        .order_by_asc(account::Column::Name)
        .order_by_asc(account::Column::Id)
        .all(db)
        .await?;
    debug!("Retrieved {} accounts for user {}", accounts.len(), user_id);
    Ok(accounts.into_iter().map(AccountDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    account_id: i32,
    patch: UpdateAccountRequest,
) -> StoreResult<AccountDto> {
    let txn = db.begin().await?;
    let existing = find_owned(&txn, user_id, account_id).await?;

    let becomes_primary = patch.is_primary == Some(true);
    let mut active: account::ActiveModel = existing.into();
    let updated_fields = AccountDto::apply_patch(&mut active, patch);
    if updated_fields.is_empty() {
        debug!("No fields to update for account ID: {}", account_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    let model = active.update(&txn).await?;
    if becomes_primary {
        clear_primary(&txn, user_id, Some(account_id)).await?;
    }
    txn.commit().await?;

    info!("Account with ID {} updated successfully", account_id);
    Ok(AccountDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, account_id: i32) -> StoreResult<()> {
    let result = account::Entity::delete_many()
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
    if result.rows_affected == 0 {
        warn!("Account with ID {} not found for deletion", account_id);
        return Err(StoreError::not_found(AccountDto::ENTITY, account_id));
    }
    info!("Account with ID {} deleted successfully", account_id);
    Ok(())
}
