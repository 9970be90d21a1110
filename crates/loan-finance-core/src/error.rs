use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid tenure: {0} months")]
    InvalidTenure(u32),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanFinanceError {
    fn from(e: serde_json::Error) -> Self {
        LoanFinanceError::SerializationError(e.to_string())
    }
}
