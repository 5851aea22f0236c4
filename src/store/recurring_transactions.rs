use common::{
    CreateRecurringTransactionRequest, RecurringTransactionDto, UpdateRecurringTransactionRequest,
};
use model::entities::recurring_transaction;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{accounts, categories, EntityMapper, StoreError, StoreResult};

async fn find_owned(
    db: &DatabaseConnection,
    user_id: &str,
    recurring_id: i32,
) -> StoreResult<recurring_transaction::Model> {
    recurring_transaction::Entity::find_by_id(recurring_id)
        .filter(recurring_transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Recurring transaction with ID {} not found for user {}", recurring_id, user_id);
            StoreError::not_found(RecurringTransactionDto::ENTITY, recurring_id)
        })
}

async fn check_references(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: Option<i32>,
    account_id: Option<i32>,
) -> StoreResult<()> {
    if let Some(category_id) = category_id {
        categories::require_reference(db, user_id, category_id).await?;
    }
    if let Some(account_id) = account_id {
        accounts::require_reference(db, user_id, account_id).await?;
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateRecurringTransactionRequest,
) -> StoreResult<RecurringTransactionDto> {
    require_user(db, user_id).await?;
    check_references(db, user_id, request.category_id, request.account_id).await?;
    debug!(
        "Creating recurring {:?} '{}' of {} ({:?})",
        request.kind, request.name, request.amount, request.frequency
    );

    let model = RecurringTransactionDto::new_active_model(user_id, request).insert(db).await?;
    info!("Recurring transaction created successfully with ID: {}", model.id);
    Ok(RecurringTransactionDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, recurring_id: i32) -> StoreResult<RecurringTransactionDto> {
    find_owned(db, user_id, recurring_id).await.map(RecurringTransactionDto::from_model)
}

/// Rows as stored, used by the forecast.
pub async fn list_models(
    db: &DatabaseConnection,
    user_id: &str,
) -> StoreResult<Vec<recurring_transaction::Model>> {
    require_user(db, user_id).await?;
    Ok(recurring_transaction::Entity::find()
        .filter(recurring_transaction::Column::UserId.eq(user_id))
        .order_by_asc(recurring_transaction::Column::Name)
        .order_by_asc(recurring_transaction::Column::Id)
        .all(db)
        .await?)
}

pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<RecurringTransactionDto>> {
    let rows = list_models(db, user_id).await?;
    debug!("Retrieved {} recurring transactions for user {}", rows.len(), user_id);
    Ok(rows.into_iter().map(RecurringTransactionDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    recurring_id: i32,
    patch: UpdateRecurringTransactionRequest,
) -> StoreResult<RecurringTransactionDto> {
    let existing = find_owned(db, user_id, recurring_id).await?;
    check_references(
        db,
        user_id,
        patch.category_id.flatten(),
        patch.account_id.flatten(),
    )
    .await?;

    // The date range is checked against the merged row, a patch may move only one end.
    let start_date = patch.start_date.unwrap_or(existing.start_date);
    let end_date = patch.end_date.unwrap_or(existing.end_date);
    if let Some(end) = end_date {
        if end < start_date {
            warn!("Rejecting recurring transaction {} ending before it starts", recurring_id);
            return Err(StoreError::Validation(format!(
                "end date {} is before start date {}",
                end, start_date
            )));
        }
    }

    let mut active: recurring_transaction::ActiveModel = existing.into();
    let updated_fields = RecurringTransactionDto::apply_patch(&mut active, patch);
    debug!("Updating recurring transaction {} fields: {}", recurring_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Recurring transaction with ID {} updated successfully", recurring_id);
    Ok(RecurringTransactionDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, recurring_id: i32) -> StoreResult<()> {
    let result = recurring_transaction::Entity::delete_many()
        .filter(recurring_transaction::Column::Id.eq(recurring_id))
        .filter(recurring_transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Recurring transaction with ID {} not found for deletion", recurring_id);
        return Err(StoreError::not_found(RecurringTransactionDto::ENTITY, recurring_id));
    }
    info!("Recurring transaction with ID {} deleted successfully", recurring_id);
    Ok(())
}
