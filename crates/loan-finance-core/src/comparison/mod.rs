//! How a loan's cash flows compare with investing the same installments, and
//! what inflation does to their real cost.

pub mod inflation;
pub mod sip;

pub use inflation::{analyze_inflation, inflation_adjusted_value, InflationInput, InflationOutput};
pub use sip::{compare_sip, sip_future_value, SipComparisonInput, SipComparisonOutput, SipProjection};

use crate::types::Months;

/// Whole years spanned by `months`, rounding any partial year up.
pub(crate) fn years_spanned(months: Months) -> u32 {
    months.div_ceil(12)
}
