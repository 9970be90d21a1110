use log::trace;
use rust_decimal::Decimal;

use crate::error::LoanFinanceError;
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::{round_currency, Money, Months, RatePercent, MAX_TENURE_MONTHS};
use crate::LoanResult;

/// Equated monthly installment for a loan of `principal` at `annual_rate_percent`
/// over `tenure_months`, rounded half-up to the cent.
///
/// Degenerate inputs saturate instead of failing:
/// * `principal <= 0` has nothing to amortize and returns 0.
/// * `tenure_months == 0` is a one-shot loan: the whole principal is due in month 1.
///
/// A negative rate is malformed rather than incomplete and is rejected, as is
/// a tenure beyond [`MAX_TENURE_MONTHS`]. A rate so high that the compound
/// factor leaves Decimal range is reported as `InvalidInput`.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: RatePercent,
    tenure_months: Months,
) -> LoanResult<Money> {
    validate_rate(annual_rate_percent)?;
    validate_tenure(tenure_months)?;

    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if tenure_months == 0 {
        trace!("compute_emi: zero tenure, principal {principal} due at month 1");
        return Ok(round_currency(principal));
    }

    let payment = annuity_payment(monthly_rate(annual_rate_percent), tenure_months, principal)?;
    Ok(round_currency(payment))
}

/// Monthly interest a loan accrues before any principal is repaid.
pub fn interest_only_payment(principal: Money, annual_rate_percent: RatePercent) -> Money {
    principal * monthly_rate(annual_rate_percent)
}

pub(crate) fn validate_rate(annual_rate_percent: RatePercent) -> LoanResult<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_tenure(tenure_months: Months) -> LoanResult<()> {
    if tenure_months > MAX_TENURE_MONTHS {
        return Err(LoanFinanceError::InvalidTenure(tenure_months));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_emi_home_loan() {
        // 25L at 8.5% for 20 years
        let emi = compute_emi(dec!(2_500_000), dec!(8.5), 240).unwrap();
        assert_eq!(emi, dec!(21695.58));
    }

    #[test]
    fn test_emi_zero_rate_is_straight_line() {
        let emi = compute_emi(dec!(1_200_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(emi, dec!(100_000));
    }

    #[test]
    fn test_emi_zero_tenure_is_lump_sum() {
        let emi = compute_emi(dec!(50_000), dec!(10), 0).unwrap();
        assert_eq!(emi, dec!(50_000));
    }

    #[test]
    fn test_emi_non_positive_principal() {
        assert_eq!(compute_emi(Decimal::ZERO, dec!(10), 12).unwrap(), Decimal::ZERO);
        assert_eq!(compute_emi(dec!(-100), dec!(10), 12).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_emi_negative_rate_rejected() {
        let err = compute_emi(dec!(100_000), dec!(-1), 12).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_emi_tenure_beyond_cap_rejected() {
        let err = compute_emi(dec!(1_000_000), dec!(8.5), 12_000).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidTenure(12_000)));
        assert!(compute_emi(dec!(1_000_000), dec!(8.5), MAX_TENURE_MONTHS).is_ok());
    }

    #[test]
    fn test_emi_overflowing_rate_is_error() {
        let err = compute_emi(dec!(1_000_000), dec!(200), 480).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_emi_is_cent_precision() {
        let emi = compute_emi(dec!(100_000), dec!(9), 36).unwrap();
        assert_eq!(emi, dec!(3179.97));
        assert!(emi.scale() <= 2);
    }

    #[test]
    fn test_interest_only_payment() {
        assert_eq!(interest_only_payment(dec!(120_000), dec!(12)), dec!(1200));
    }
}
