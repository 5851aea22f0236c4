use common::{CreateTransactionRequest, TransactionDto, UpdateTransactionRequest};
use model::entities::transaction;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{accounts, categories, EntityMapper, StoreError, StoreResult};

async fn find_owned(db: &DatabaseConnection, user_id: &str, transaction_id: i32) -> StoreResult<transaction::Model> {
    transaction::Entity::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Transaction with ID {} not found for user {}", transaction_id, user_id);
            StoreError::not_found(TransactionDto::ENTITY, transaction_id)
        })
}

async fn check_references(
    db: &DatabaseConnection,
    user_id: &str,
    account_id: Option<i32>,
    category_id: Option<i32>,
) -> StoreResult<()> {
    if let Some(account_id) = account_id {
        accounts::require_reference(db, user_id, account_id).await?;
    }
    if let Some(category_id) = category_id {
        categories::require_reference(db, user_id, category_id).await?;
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateTransactionRequest,
) -> StoreResult<TransactionDto> {
    require_user(db, user_id).await?;
    check_references(db, user_id, request.account_id, request.category_id).await?;
    debug!(
        "Creating transaction '{}' of {} on {}",
        request.description, request.amount, request.date
    );

    let model = TransactionDto::new_active_model(user_id, request).insert(db).await?;
    info!("Transaction created successfully with ID: {}", model.id);
    Ok(TransactionDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, transaction_id: i32) -> StoreResult<TransactionDto> {
    find_owned(db, user_id, transaction_id).await.map(TransactionDto::from_model)
}

/// Transactions of the user, newest first.
pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<TransactionDto>> {
    require_user(db, user_id).await?;
    let transactions = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;
    debug!("Retrieved {} transactions for user {}", transactions.len(), user_id);
    Ok(transactions.into_iter().map(TransactionDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i32,
    patch: UpdateTransactionRequest,
) -> StoreResult<TransactionDto> {
    let existing = find_owned(db, user_id, transaction_id).await?;
    check_references(db, user_id, patch.account_id.flatten(), patch.category_id.flatten()).await?;

    let mut active: transaction::ActiveModel = existing.into();
    let updated_fields = TransactionDto::apply_patch(&mut active, patch);
    debug!("Updating transaction {} fields: {}", transaction_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Transaction with ID {} updated successfully", transaction_id);
    Ok(TransactionDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, transaction_id: i32) -> StoreResult<()> {
    let result = transaction::Entity::delete_many()
        .filter(transaction::Column::Id.eq(transaction_id))
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Transaction with ID {} not found for deletion", transaction_id);
        return Err(StoreError::not_found(TransactionDto::ENTITY, transaction_id));
    }
    info!("Transaction with ID {} deleted successfully", transaction_id);
    Ok(())
}
