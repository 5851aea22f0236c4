use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// A date could not be represented (year out of chrono's range, invalid month)
    #[error("Date error: {0}")]
    Date(String),

    /// Input values that no calculation can work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The payments never amortize the debts within the simulation horizon
    #[error("Debts are not paid off within {months} months")]
    PayoffNotReached { months: u32 },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
