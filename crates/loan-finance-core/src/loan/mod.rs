pub mod calculator;
pub mod catalogue;
pub mod charges;
pub mod params;
pub mod tax;

pub use calculator::{compute_loan, disbursed_amount, LoanCalculationResult};
pub use params::{ChargeTiming, InterestType, LoanCategory, LoanCharges, LoanParameters, LoanType, TopUpParameters};
pub use tax::{is_tax_eligible, tax_benefit};
