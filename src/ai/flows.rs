use common::{
    CategorizeTransactionInput, CategorizeTransactionOutput, SuggestExpenseCategoriesInput,
    SuggestExpenseCategoriesOutput, MAX_SUGGESTED_CATEGORIES,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use validator::Validate;

use super::{AiError, PromptModel};

fn categorize_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "category": {"type": "string", "description": "Best matching category label"},
            "confidence": {"type": "number", "minimum": 0, "maximum": 1}
        },
        "required": ["category", "confidence"]
    })
}

fn suggest_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "categories": {
                "type": "array",
                "items": {"type": "string"},
                "maxItems": MAX_SUGGESTED_CATEGORIES
            }
        },
        "required": ["categories"]
    })
}

/// Parses and re-validates a model answer.
fn decode<T: DeserializeOwned + Validate>(raw: Value) -> Result<T, AiError> {
    let output: T = serde_json::from_value(raw).map_err(|err| AiError::InvalidOutput(err.to_string()))?;
    output
        .validate()
        .map_err(|err| AiError::InvalidOutput(err.to_string()))?;
    Ok(output)
}

/// Picks one category for a transaction description.
#[instrument(skip(model))]
pub async fn categorize_transaction(
    model: &dyn PromptModel,
    input: CategorizeTransactionInput,
) -> Result<CategorizeTransactionOutput, AiError> {
    input
        .validate()
        .map_err(|err| AiError::InvalidInput(err.to_string()))?;

    let prompt = format!(
        "You categorize personal finance transactions.\n\
         Return the single best spending or income category for the transaction below \
         and your confidence between 0 and 1.\n\n\
         Transaction: {}",
        input.description
    );
    let output: CategorizeTransactionOutput = decode(model.generate(&prompt, &categorize_schema()).await?)?;
    debug!("Categorized as {} ({})", output.category, output.confidence);
    Ok(output)
}

/// Suggests up to five expense categories for a description.
#[instrument(skip(model))]
pub async fn suggest_expense_categories(
    model: &dyn PromptModel,
    input: SuggestExpenseCategoriesInput,
) -> Result<SuggestExpenseCategoriesOutput, AiError> {
    input
        .validate()
        .map_err(|err| AiError::InvalidInput(err.to_string()))?;

    let prompt = format!(
        "You help people budget.\n\
         Suggest at most {} short expense category names that fit the description below.\n\n\
         Description: {}",
        MAX_SUGGESTED_CATEGORIES, input.description
    );
    let output: SuggestExpenseCategoriesOutput = decode(model.generate(&prompt, &suggest_schema()).await?)?;
    debug!("Suggested {} categories", output.categories.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct CannedModel {
        answer: Value,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn new(answer: Value) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PromptModel for CannedModel {
        async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, AiError> {
            assert_eq!(schema["type"], "object");
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    #[derive(Debug)]
    struct DownModel;

    #[async_trait]
    impl PromptModel for DownModel {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, AiError> {
            Err(AiError::Status {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn categorize_input(description: &str) -> CategorizeTransactionInput {
        CategorizeTransactionInput {
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_categorize_transaction() {
        let model = CannedModel::new(json!({"category": "Dining", "confidence": 0.82}));
        let output = categorize_transaction(&model, categorize_input("Pizza Palace #12"))
            .await
            .unwrap();

        assert_eq!(output.category, "Dining");
        assert_eq!(output.confidence, 0.82);
        assert!(model.prompts.lock().unwrap()[0].contains("Pizza Palace #12"));
    }

    #[tokio::test]
    async fn test_empty_description_never_reaches_model() {
        let model = CannedModel::new(json!({}));
        let err = categorize_transaction(&model, categorize_input("")).await.unwrap_err();

        assert!(matches!(err, AiError::InvalidInput(_)));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_invalid_output() {
        let model = CannedModel::new(json!({"category": "Dining", "confidence": 1.5}));
        let err = categorize_transaction(&model, categorize_input("Pizza")).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_suggest_expense_categories() {
        let model = CannedModel::new(json!({"categories": ["Groceries", "Household"]}));
        let output = suggest_expense_categories(
            &model,
            SuggestExpenseCategoriesInput {
                description: "Weekly supermarket run".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(output.categories, vec!["Groceries", "Household"]);
    }

    #[tokio::test]
    async fn test_more_than_five_suggestions_is_invalid_output() {
        let model = CannedModel::new(json!({"categories": ["a", "b", "c", "d", "e", "f"]}));
        let err = suggest_expense_categories(
            &model,
            SuggestExpenseCategoriesInput {
                description: "Anything".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = categorize_transaction(&DownModel, categorize_input("Rent")).await.unwrap_err();
        assert!(matches!(err, AiError::Status { status: 503, .. }));
    }
}
