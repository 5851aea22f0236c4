use common::{BudgetCategoryDto, CreateBudgetCategoryRequest, UpdateBudgetCategoryRequest};
use model::entities::budget_category;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{categories, EntityMapper, StoreError, StoreResult};

async fn find_owned(
    db: &DatabaseConnection,
    user_id: &str,
    budget_category_id: i32,
) -> StoreResult<budget_category::Model> {
    budget_category::Entity::find_by_id(budget_category_id)
        .filter(budget_category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Budget category with ID {} not found for user {}", budget_category_id, user_id);
            StoreError::not_found(BudgetCategoryDto::ENTITY, budget_category_id)
        })
}

pub async fn require_reference(
    db: &DatabaseConnection,
    user_id: &str,
    budget_category_id: i32,
) -> StoreResult<()> {
    find_owned(db, user_id, budget_category_id)
        .await
        .map(|_| ())
        .map_err(|err| match err {
            StoreError::NotFound { .. } => StoreError::Validation(format!(
                "budget category {} does not exist",
                budget_category_id
            )),
            other => other,
        })
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateBudgetCategoryRequest,
) -> StoreResult<BudgetCategoryDto> {
    require_user(db, user_id).await?;
    if let Some(category_id) = request.category_id {
        categories::require_reference(db, user_id, category_id).await?;
    }
    debug!("Creating budget category '{}' of {}", request.name, request.budgeted_amount);

    let model = BudgetCategoryDto::new_active_model(user_id, request).insert(db).await?;
    info!("Budget category created successfully with ID: {}", model.id);
    Ok(BudgetCategoryDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, budget_category_id: i32) -> StoreResult<BudgetCategoryDto> {
    find_owned(db, user_id, budget_category_id).await.map(BudgetCategoryDto::from_model)
}

/// Rows as stored, used by the forecast.
pub async fn list_models(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<budget_category::Model>> {
    require_user(db, user_id).await?;
    Ok(budget_category::Entity::find()
        .filter(budget_category::Column::UserId.eq(user_id))
        .order_by_asc(budget_category::Column::Name)
        .order_by_asc(budget_category::Column::Id)
        .all(db)
        .await?)
}

pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<BudgetCategoryDto>> {
    let rows = list_models(db, user_id).await?;
    debug!("Retrieved {} budget categories for user {}", rows.len(), user_id);
    Ok(rows.into_iter().map(BudgetCategoryDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    budget_category_id: i32,
    patch: UpdateBudgetCategoryRequest,
) -> StoreResult<BudgetCategoryDto> {
    let existing = find_owned(db, user_id, budget_category_id).await?;
    if let Some(Some(category_id)) = patch.category_id {
        categories::require_reference(db, user_id, category_id).await?;
    }

    let mut active: budget_category::ActiveModel = existing.into();
    let updated_fields = BudgetCategoryDto::apply_patch(&mut active, patch);
    debug!("Updating budget category {} fields: {}", budget_category_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Budget category with ID {} updated successfully", budget_category_id);
    Ok(BudgetCategoryDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, budget_category_id: i32) -> StoreResult<()> {
    let result = budget_category::Entity::delete_many()
        .filter(budget_category::Column::Id.eq(budget_category_id))
        .filter(budget_category::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Budget category with ID {} not found for deletion", budget_category_id);
        return Err(StoreError::not_found(BudgetCategoryDto::ENTITY, budget_category_id));
    }
    info!("Budget category with ID {} deleted successfully", budget_category_id);
    Ok(())
}
