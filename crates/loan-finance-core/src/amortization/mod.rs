//! The amortization engine: EMI, month-by-month schedules with prepayments,
//! and the inversions that solve for tenure or rate from a target EMI.
//!
//! Every function is a pure mapping from scalar inputs to a freshly computed
//! value; nothing is cached between calls.

pub mod emi;
pub mod schedule;
pub mod solver;

pub use emi::compute_emi;
pub use schedule::{build_schedule, EmiScheduleItem, PrepaymentScenario, PrepaymentType, ScheduleTotals};
pub use solver::{rate_from_emi, solve, tenure_from_emi, RateSolution, SolveFor, Solution, SolverInput};
