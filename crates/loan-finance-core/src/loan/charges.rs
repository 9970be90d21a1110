use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, RatePercent};

/// Default foreclosure / late-payment penalty, % of the base amount.
pub const DEFAULT_PENALTY_RATE: RatePercent = dec!(2);

/// Penalty for closing the loan early on `remaining_balance`.
pub fn pre_closure_charges(remaining_balance: Money, penalty_rate_percent: RatePercent) -> Money {
    remaining_balance * penalty_rate_percent / dec!(100)
}

/// Late fee on an installment, pro-rated over a 30-day month.
pub fn late_fees(emi: Money, days_late: u32, penalty_rate_percent: RatePercent) -> Money {
    let monthly_penalty = emi * penalty_rate_percent / dec!(100);
    monthly_penalty * Decimal::from(days_late) / dec!(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_closure_default_rate() {
        assert_eq!(pre_closure_charges(dec!(1_000_000), DEFAULT_PENALTY_RATE), dec!(20_000));
    }

    #[test]
    fn test_late_fees_pro_rated() {
        // 2% of 30,000 = 600 a month; 15 days = 300
        assert_eq!(late_fees(dec!(30_000), 15, DEFAULT_PENALTY_RATE), dec!(300));
        assert_eq!(late_fees(dec!(30_000), 0, DEFAULT_PENALTY_RATE), Decimal::ZERO);
    }
}
