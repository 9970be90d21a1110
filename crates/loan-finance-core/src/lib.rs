pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "whatif")]
pub mod whatif;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::LoanFinanceError;
pub use types::*;

/// Standard result type for all loan-finance operations
pub type LoanResult<T> = Result<T, LoanFinanceError>;
