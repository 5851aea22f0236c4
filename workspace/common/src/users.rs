use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::patch::{currency_code, deserialize_some, non_negative};

/// User as exposed by the API. The id is the hosted identity id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Hosted identity id
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    /// `null` clears the display name
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub display_name: Option<Option<String>>,
}

/// How extra money is spread over debts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebtStrategy {
    Snowball,
    #[default]
    Avalanche,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDto {
    pub user_id: String,
    pub currency: String,
    pub show_onboarding: bool,
    pub debt_strategy: DebtStrategy,
    pub extra_debt_payment: Decimal,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[validate(custom(function = "currency_code"))]
    pub currency: Option<String>,
    pub show_onboarding: Option<bool>,
    pub debt_strategy: Option<DebtStrategy>,
    #[validate(custom(function = "non_negative"))]
    pub extra_debt_payment: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_display_name_tri_state() {
        let untouched: UpdateUserRequest = serde_json::from_str(r#"{"email": "a@b.io"}"#).unwrap();
        assert_eq!(untouched.display_name, None);

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"displayName": null}"#).unwrap();
        assert_eq!(cleared.display_name, Some(None));
    }

    #[test]
    fn test_preferences_validation() {
        let bad = UpdatePreferencesRequest {
            currency: Some("dollars".to_string()),
            extra_debt_payment: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("currency"));
        assert!(fields.contains_key("extra_debt_payment"));

        let good = UpdatePreferencesRequest {
            currency: Some("EUR".to_string()),
            debt_strategy: Some(DebtStrategy::Snowball),
            ..Default::default()
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_strategy_wire_format() {
        assert_eq!(serde_json::to_string(&DebtStrategy::Snowball).unwrap(), r#""snowball""#);
        assert_eq!(DebtStrategy::default(), DebtStrategy::Avalanche);
    }
}
