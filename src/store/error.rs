use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Failures of the data-access layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row with this id exists for the requesting user
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A unique or foreign key constraint rejected the write
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// The input is well formed but refers to something unusable
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Error code exposed in API error bodies.
    pub fn code(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => {
                format!("{}_NOT_FOUND", entity.to_uppercase().replace(' ', "_"))
            }
            Self::Conflict(_) => "CONSTRAINT_VIOLATION".to_string(),
            Self::Validation(_) => "VALIDATION_ERROR".to_string(),
            Self::Database(_) => "DATABASE_ERROR".to_string(),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::Conflict(detail),
            _ => {
                error!("Database operation failed: {}", err);
                StoreError::Database(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreError::not_found("account", 7).code(), "ACCOUNT_NOT_FOUND");
        assert_eq!(
            StoreError::not_found("budget category", 7).code(),
            "BUDGET_CATEGORY_NOT_FOUND"
        );
        assert_eq!(StoreError::Conflict("x".into()).code(), "CONSTRAINT_VIOLATION");
        assert_eq!(StoreError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(
            StoreError::from(DbErr::Custom("boom".into())).code(),
            "DATABASE_ERROR"
        );
    }
}
