//! What-if analysis on top of a base loan: lump-sum prepayments, top-ups,
//! and re-solving after one variable changes.

pub mod adjustment;
pub mod prepayment;
pub mod top_up;

pub use adjustment::{adjust, AdjustmentInput, AdjustmentOutput, Change, LoanSummary};
pub use prepayment::{analyze_prepayment, PrepaymentInput, PrepaymentOutput};
pub use top_up::{analyze_top_up, loan_status, merge_top_up, LoanStatus, TopUpOutput};
