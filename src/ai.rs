//! Suggestion flows backed by a hosted generative model.

mod flows;
mod model;

pub use flows::{categorize_transaction, suggest_expense_categories};
pub use model::{HostedModel, PromptModel};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The model answered with something that does not fit the declared schema
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}
