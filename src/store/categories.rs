use common::{CategoryDto, CreateCategoryRequest, UpdateCategoryRequest};
use model::entities::category;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, warn};

use super::users::require_user;
use super::{EntityMapper, StoreError, StoreResult};

async fn find_owned(db: &DatabaseConnection, user_id: &str, category_id: i32) -> StoreResult<category::Model> {
    category::Entity::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Category with ID {} not found for user {}", category_id, user_id);
            StoreError::not_found(CategoryDto::ENTITY, category_id)
        })
}

/// Fails with `Validation` unless the category exists and belongs to the user.
pub async fn require_reference(db: &DatabaseConnection, user_id: &str, category_id: i32) -> StoreResult<()> {
    find_owned(db, user_id, category_id)
        .await
        .map(|_| ())
        .map_err(|err| match err {
            StoreError::NotFound { .. } => {
                StoreError::Validation(format!("category {} does not exist", category_id))
            }
            other => other,
        })
}

/// Category names are unique per user.
async fn ensure_name_free(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    except_id: Option<i32>,
) -> StoreResult<()> {
    let mut query = category::Entity::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(category::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        warn!("Category name '{}' already used by user {}", name, user_id);
        return Err(StoreError::Conflict(format!("category '{}' already exists", name)));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    request: CreateCategoryRequest,
) -> StoreResult<CategoryDto> {
    require_user(db, user_id).await?;
    debug!("Creating category with name: {}", request.name);
    ensure_name_free(db, user_id, &request.name, None).await?;

    let model = CategoryDto::new_active_model(user_id, request).insert(db).await?;
    info!("Category created successfully with ID: {}", model.id);
    Ok(CategoryDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str, category_id: i32) -> StoreResult<CategoryDto> {
    find_owned(db, user_id, category_id).await.map(CategoryDto::from_model)
}

pub async fn list(db: &DatabaseConnection, user_id: &str) -> StoreResult<Vec<CategoryDto>> {
    require_user(db, user_id).await?;
    let categories = category::Entity::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    debug!("Retrieved {} categories for user {}", categories.len(), user_id);
    Ok(categories.into_iter().map(CategoryDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i32,
    patch: UpdateCategoryRequest,
) -> StoreResult<CategoryDto> {
    let existing = find_owned(db, user_id, category_id).await?;
    if let Some(name) = &patch.name {
        ensure_name_free(db, user_id, name, Some(category_id)).await?;
    }

    let mut active: category::ActiveModel = existing.into();
    let updated_fields = CategoryDto::apply_patch(&mut active, patch);
    debug!("Updating category {} fields: {}", category_id, updated_fields.join(", "));
    let model = active.update(db).await?;
    info!("Category with ID {} updated successfully", category_id);
    Ok(CategoryDto::from_model(model))
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, category_id: i32) -> StoreResult<()> {
    let result = category::Entity::delete_many()
        .filter(category::Column::Id.eq(category_id))
        .filter(category::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Category with ID {} not found for deletion", category_id);
        return Err(StoreError::not_found(CategoryDto::ENTITY, category_id));
    }
    info!("Category with ID {} deleted successfully", category_id);
    Ok(())
}
