use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Result of a login or logout. Failures are values, not errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error: Option<String>,
    /// View to navigate to next
    pub redirect: Option<String>,
}

impl AuthOutcome {
    pub fn redirect(to: &str) -> Self {
        Self {
            success: true,
            error: None,
            redirect: Some(to.to_string()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            redirect: None,
        }
    }
}

/// The signed in user, built from session claims.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserDto {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub show_onboarding: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    pub show_onboarding: bool,
    /// Set when the change could not be saved. The flow continues anyway.
    pub notice: Option<String>,
}
