use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const MAX_SUGGESTED_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct CategorizeTransactionInput {
    /// Free text transaction description
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct CategorizeTransactionOutput {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// Between 0 and 1
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct SuggestExpenseCategoriesInput {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct SuggestExpenseCategoriesOutput {
    /// At most five labels
    #[validate(length(max = 5))]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds() {
        let ok = CategorizeTransactionOutput {
            category: "Groceries".to_string(),
            confidence: 0.93,
        };
        assert!(ok.validate().is_ok());

        let too_high = CategorizeTransactionOutput {
            confidence: 1.2,
            ..ok
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_at_most_five_suggestions() {
        let six = SuggestExpenseCategoriesOutput {
            categories: (0..6).map(|i| format!("Label {}", i)).collect(),
        };
        assert!(six.validate().is_err());
        assert_eq!(MAX_SUGGESTED_CATEGORIES, 5);
    }
}
