use common::{CreateDebtAccountRequest, DebtAccountDto, UpdateDebtAccountRequest};
use model::entities::debt_account;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{EntityMapper, StoreError, StoreResult};

async fn find_owned(db: &DatabaseConnection, user_id: &str, debt_id: i32) -> StoreResult<debt_account::Model> {
    debt_account::Entity::find_by_id(debt_id)
        .filter(debt_account::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Debt with ID {} not found for user {}", debt_id, user_id);
            StoreError::not_found(DebtAccountDto::ENTITY, debt_id)
        })
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateDebtAccountRequest,
) -> StoreResult<DebtAccountDto> {
    require_user(db, user_id).await?;
    debug!(
        "Creating debt '{}' with balance {} at {}% APR",
        request.name, request.balance, request.apr
    );

    let model = DebtAccountDto::new_active_model(user_id, request).insert(db).await?;
    info!("Debt created successfully with ID: {}", model.id);
    Ok(DebtAccountDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, debt_id: i32) -> StoreResult<DebtAccountDto> {
    find_owned(db, user_id, debt_id).await.map(DebtAccountDto::from_model)
}

/// Rows as stored, used by the forecast and the payoff plan.
pub async fn list_models(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<debt_account::Model>> {
    require_user(db, user_id).await?;
    Ok(debt_account::Entity::find()
        .filter(debt_account::Column::UserId.eq(user_id))
        .order_by_asc(debt_account::Column::Name)
        .order_by_asc(debt_account::Column::Id)
        .all(db)
        .await?)
}

pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<DebtAccountDto>> {
    let rows = list_models(db, user_id).await?;
    debug!("Retrieved {} debts for user {}", rows.len(), user_id);
    Ok(rows.into_iter().map(DebtAccountDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    debt_id: i32,
    patch: UpdateDebtAccountRequest,
) -> StoreResult<DebtAccountDto> {
    let existing = find_owned(db, user_id, debt_id).await?;

    let mut active: debt_account::ActiveModel = existing.into();
    let updated_fields = DebtAccountDto::apply_patch(&mut active, patch);
    debug!("Updating debt {} fields: {}", debt_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Debt with ID {} updated successfully", debt_id);
    Ok(DebtAccountDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, debt_id: i32) -> StoreResult<()> {
    let result = debt_account::Entity::delete_many()
        .filter(debt_account::Column::Id.eq(debt_id))
        .filter(debt_account::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Debt with ID {} not found for deletion", debt_id);
        return Err(StoreError::not_found(DebtAccountDto::ENTITY, debt_id));
    }
    info!("Debt with ID {} deleted successfully", debt_id);
    Ok(())
}
