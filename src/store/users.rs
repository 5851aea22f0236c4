use chrono::Utc;
use common::{CreateUserRequest, UpdateUserRequest, UserDto};
use model::entities::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::{debug, info, trace, warn};

use super::{EntityMapper, StoreError, StoreResult};
use crate::session::SessionClaims;

/// Fails with `NotFound` unless the user row exists.
pub async fn require_user(db: &DatabaseConnection, user_id: &str) -> StoreResult<user::Model> {
    user::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("User {} not found", user_id);
            StoreError::not_found(UserDto::ENTITY, user_id)
        })
}

pub async fn create(db: &DatabaseConnection, request: CreateUserRequest) -> StoreResult<UserDto> {
    debug!("Creating user with id: {}", request.id);
    if user::Entity::find_by_id(request.id.clone()).one(db).await?.is_some() {
        warn!("User {} already exists", request.id);
        return Err(StoreError::Conflict(format!("user {} already exists", request.id)));
    }
    let model = UserDto::new_active_model(&request.id.clone(), request).insert(db).await?;
    info!("User created successfully with ID: {}", model.id);
    Ok(UserDto::from_model(model))
}

pub async fn get(db: &DatabaseConnection, user_id: &str) -> StoreResult<UserDto> {
    require_user(db, user_id).await.map(UserDto::from_model)
}

/// All users ordered by email, then id.
pub async fn list(db: &DatabaseConnection) -> StoreResult<Vec<UserDto>> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Email)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    debug!("Retrieved {} users from database", users.len());
    Ok(users.into_iter().map(UserDto::from_model).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    patch: UpdateUserRequest,
) -> StoreResult<UserDto> {
    let existing = require_user(db, user_id).await?;
    let mut active: user::ActiveModel = existing.into();
    let updated_fields = UserDto::apply_patch(&mut active, patch);
    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }
    let model = active.update(db).await?;
    info!("User with ID {} updated successfully", user_id);
    Ok(UserDto::from_model(model))
}

/// Deletes the user and, through cascading keys, everything it owns.
pub async fn delete(db: &DatabaseConnection, user_id: &str) -> StoreResult<()> {
    let result = user::Entity::delete_by_id(user_id.to_string()).exec(db).await?;
    debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
    if result.rows_affected == 0 {
        warn!("User with ID {} not found for deletion", user_id);
        return Err(StoreError::not_found(UserDto::ENTITY, user_id));
    }
    info!("User with ID {} deleted successfully", user_id);
    Ok(())
}

/// Creates or refreshes the user row of a hosted identity from its session claims.
pub async fn ensure_user(db: &DatabaseConnection, claims: &SessionClaims) -> StoreResult<UserDto> {
    trace!("Ensuring user row for identity {}", claims.sub);
    match user::Entity::find_by_id(claims.sub.clone()).one(db).await? {
        Some(existing) => {
            let display_name = claims.display_name();
            if existing.email == claims.email && existing.display_name == display_name {
                return Ok(UserDto::from_model(existing));
            }
            let mut active: user::ActiveModel = existing.into();
            active.email = Set(claims.email.clone());
            active.display_name = Set(display_name);
            let model = active.update(db).await?;
            debug!("Refreshed user {} from session claims", model.id);
            Ok(UserDto::from_model(model))
        }
        None => {
            let model = user::ActiveModel {
                id: Set(claims.sub.clone()),
                email: Set(claims.email.clone()),
                display_name: Set(claims.display_name()),
                created_at: Set(Utc::now().naive_utc()),
            }
            .insert(db)
            .await?;
            info!("Created user {} from session claims", model.id);
            Ok(UserDto::from_model(model))
        }
    }
}
