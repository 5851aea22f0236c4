use common::{PreferencesDto, UpdatePreferencesRequest};
use model::entities::user_preference;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TryIntoModel,
};
use tracing::{debug, info};

use super::mapper::default_preferences;
use super::users::require_user;
use super::{EntityMapper, StoreResult};

async fn find(db: &DatabaseConnection, user_id: &str) -> StoreResult<Option<user_preference::Model>> {
    Ok(user_preference::Entity::find()
        .filter(user_preference::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Stored preferences, or the defaults when the user never saved any.
pub async fn get_or_default(db: &DatabaseConnection, user_id: &str) -> StoreResult<PreferencesDto> {
    require_user(db, user_id).await?;
    match find(db, user_id).await? {
        Some(model) => Ok(PreferencesDto::from_model(model)),
        None => {
            debug!("No preferences stored for user {}, using defaults", user_id);
            Ok(default_preferences(user_id))
        }
    }
}

/// Writes the present fields, creating the row from defaults first if needed.
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    patch: UpdatePreferencesRequest,
) -> StoreResult<PreferencesDto> {
    require_user(db, user_id).await?;
    let mut active: user_preference::ActiveModel = match find(db, user_id).await? {
        Some(model) => model.into(),
        None => PreferencesDto::new_active_model(user_id, ()),
    };
    let updated_fields = PreferencesDto::apply_patch(&mut active, patch);
    debug!("Updating preferences of user {}: {}", user_id, updated_fields.join(", "));
    let model = active.save(db).await?.try_into_model()?;
    info!("Preferences of user {} saved", user_id);
    Ok(PreferencesDto::from_model(model))
}

/// Persists the onboarding flag only.
pub async fn set_show_onboarding(
    db: &DatabaseConnection,
    user_id: &str,
    show_onboarding: bool,
) -> StoreResult<PreferencesDto> {
    update(
        db,
        user_id,
        UpdatePreferencesRequest {
            show_onboarding: Some(show_onboarding),
            ..Default::default()
        },
    )
    .await
}
