use common::{CreateVariableExpenseRequest, UpdateVariableExpenseRequest, VariableExpenseDto};
use model::entities::variable_expense;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{budget_categories, EntityMapper, StoreError, StoreResult};

async fn find_owned(db: &DatabaseConnection, user_id: &str, expense_id: i32) -> StoreResult<variable_expense::Model> {
    variable_expense::Entity::find_by_id(expense_id)
        .filter(variable_expense::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Variable expense with ID {} not found for user {}", expense_id, user_id);
            StoreError::not_found(VariableExpenseDto::ENTITY, expense_id)
        })
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateVariableExpenseRequest,
) -> StoreResult<VariableExpenseDto> {
    require_user(db, user_id).await?;
    if let Some(budget_category_id) = request.budget_category_id {
        budget_categories::require_reference(db, user_id, budget_category_id).await?;
    }
    debug!("Creating variable expense '{}' of {} on {}", request.name, request.amount, request.date);

    let model = VariableExpenseDto::new_active_model(user_id, request).insert(db).await?;
    info!("Variable expense created successfully with ID: {}", model.id);
    Ok(VariableExpenseDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, expense_id: i32) -> StoreResult<VariableExpenseDto> {
    find_owned(db, user_id, expense_id).await.map(VariableExpenseDto::from_model)
}

pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<VariableExpenseDto>> {
    require_user(db, user_id).await?;
    let expenses = variable_expense::Entity::find()
        .filter(variable_expense::Column::UserId.eq(user_id))
        .order_by_asc(variable_expense::Column::Name)
        .order_by_asc(variable_expense::Column::Id)
        .all(db)
        .await?;
    debug!("Retrieved {} variable expenses for user {}", expenses.len(), user_id);
    Ok(expenses.into_iter().map(VariableExpenseDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    expense_id: i32,
    patch: UpdateVariableExpenseRequest,
) -> StoreResult<VariableExpenseDto> {
    let existing = find_owned(db, user_id, expense_id).await?;
    if let Some(Some(budget_category_id)) = patch.budget_category_id {
        budget_categories::require_reference(db, user_id, budget_category_id).await?;
    }

    let mut active: variable_expense::ActiveModel = existing.into();
    let updated_fields = VariableExpenseDto::apply_patch(&mut active, patch);
    debug!("Updating variable expense {} fields: {}", expense_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Variable expense with ID {} updated successfully", expense_id);
    Ok(VariableExpenseDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, expense_id: i32) -> StoreResult<()> {
    let result = variable_expense::Entity::delete_many()
        .filter(variable_expense::Column::Id.eq(expense_id))
        .filter(variable_expense::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Variable expense with ID {} not found for deletion", expense_id);
        return Err(StoreError::not_found(VariableExpenseDto::ENTITY, expense_id));
    }
    info!("Variable expense with ID {} deleted successfully", expense_id);
    Ok(())
}
