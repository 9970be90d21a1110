use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LoanFinanceError;
use crate::types::{Money, Months, RatePercent};
use crate::LoanResult;

/// Convert an annual percentage rate into a monthly decimal rate (8.5 → 0.0070833…).
pub fn monthly_rate(annual_rate_percent: RatePercent) -> Decimal {
    annual_rate_percent / dec!(1200)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Errors once the factor leaves Decimal range (about 7.9e28).
pub fn compound(rate: Decimal, n: u32) -> LoanResult<Decimal> {
    let factor = Decimal::ONE + rate;
    (0..n).try_fold(Decimal::ONE, |acc, _| {
        acc.checked_mul(factor).ok_or_else(|| out_of_range("rate"))
    })
}

fn out_of_range(field: &str) -> LoanFinanceError {
    LoanFinanceError::InvalidInput {
        field: field.into(),
        reason: "Rate and period count compound beyond representable range".into(),
    }
}

/// Level payment that retires `present_value` over `nper` periods at `rate` per period.
///
/// Unrounded; callers round to currency precision where the payment is quoted.
pub fn annuity_payment(rate: Decimal, nper: Months, present_value: Money) -> LoanResult<Money> {
    if nper == 0 {
        return Err(LoanFinanceError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(present_value / Decimal::from(nper));
    }

    let factor = compound(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than zero".into(),
        });
    }

    present_value
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| out_of_range("present_value"))
}

/// Future value of an ordinary annuity: `pmt` deposited at the end of each of `nper` periods.
pub fn annuity_future_value(rate: Decimal, nper: Months, pmt: Money) -> LoanResult<Money> {
    if rate.is_zero() {
        return pmt
            .checked_mul(Decimal::from(nper))
            .ok_or_else(|| out_of_range("pmt"));
    }
    pmt.checked_mul(compound(rate, nper)? - Decimal::ONE)
        .and_then(|v| v.checked_div(rate))
        .ok_or_else(|| out_of_range("pmt"))
}

/// Grow `amount` at `annual_rate_percent` compounded yearly for `years` years.
pub fn grow_annually(amount: Money, annual_rate_percent: RatePercent, years: u32) -> LoanResult<Money> {
    amount
        .checked_mul(compound(annual_rate_percent / dec!(100), years)?)
        .ok_or_else(|| out_of_range("amount"))
}
