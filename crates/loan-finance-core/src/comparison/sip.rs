use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::inflation::inflation_adjusted_value;
use super::years_spanned;
use crate::error::LoanFinanceError;
use crate::time_value::{annuity_future_value, monthly_rate};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Months, RatePercent};
use crate::LoanResult;

fn default_inflation() -> RatePercent {
    dec!(6)
}

/// Growth of a fixed monthly investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipProjection {
    pub final_value: Money,
    pub total_investment: Money,
    pub returns: Money,
}

/// Future value of investing `monthly_amount` at the end of each month for
/// `months` months at `annual_return_percent`, compounded monthly.
pub fn sip_future_value(
    monthly_amount: Money,
    annual_return_percent: RatePercent,
    months: Months,
) -> LoanResult<SipProjection> {
    let total_investment = monthly_amount * Decimal::from(months);
    let final_value =
        annuity_future_value(monthly_rate(annual_return_percent), months, monthly_amount)?;
    Ok(SipProjection {
        final_value: round_currency(final_value),
        total_investment: round_currency(total_investment),
        returns: round_currency(final_value - total_investment),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipComparisonInput {
    pub emi: Money,
    pub tenure: Months,
    /// Expected SIP return, % p.a.
    pub sip_return_rate: RatePercent,
    #[serde(default = "default_inflation")]
    pub inflation_rate: RatePercent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipComparisonOutput {
    /// EMI × tenure.
    pub loan_total_repayment: Money,
    pub sip: SipProjection,
    /// SIP value less loan repayment.
    pub sip_advantage: Money,
    pub years: u32,
    pub loan_inflation_adjusted: Money,
    pub sip_inflation_adjusted: Money,
    pub inflation_adjusted_advantage: Money,
}

/// Paying an EMI versus investing the same amount every month.
pub fn compare_sip(input: &SipComparisonInput) -> LoanResult<ComputationOutput<SipComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.emi < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "emi".into(),
            reason: "EMI cannot be negative".into(),
        });
    }
    if input.sip_return_rate < Decimal::ZERO || input.inflation_rate < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "sip_return_rate".into(),
            reason: "Return and inflation rates cannot be negative".into(),
        });
    }
    if input.emi.is_zero() || input.tenure == 0 {
        warnings.push("EMI and tenure are required for a meaningful comparison".into());
    }

    let loan_total_repayment = round_currency(input.emi * Decimal::from(input.tenure));
    let sip = sip_future_value(input.emi, input.sip_return_rate, input.tenure)?;
    let years = years_spanned(input.tenure);

    let loan_inflation_adjusted =
        round_currency(inflation_adjusted_value(loan_total_repayment, years, input.inflation_rate)?);
    let sip_inflation_adjusted =
        round_currency(inflation_adjusted_value(sip.final_value, years, input.inflation_rate)?);

    let output = SipComparisonOutput {
        loan_total_repayment,
        sip_advantage: sip.final_value - loan_total_repayment,
        years,
        loan_inflation_adjusted,
        sip_inflation_adjusted,
        inflation_adjusted_advantage: sip_inflation_adjusted - loan_inflation_adjusted,
        sip,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI outflow versus monthly SIP (ordinary annuity, monthly compounding)",
        &serde_json::json!({
            "emi": input.emi.to_string(),
            "tenure_months": input.tenure,
            "sip_return_rate_pct": input.sip_return_rate.to_string(),
            "inflation_rate_pct": input.inflation_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sip_zero_rate_is_total_investment() {
        let sip = sip_future_value(dec!(10_000), Decimal::ZERO, 24).unwrap();
        assert_eq!(sip.final_value, dec!(240_000));
        assert_eq!(sip.returns, Decimal::ZERO);
    }

    #[test]
    fn test_sip_one_year_at_twelve_percent() {
        // 1000 × ((1.01^12 − 1) / 0.01) = 12,682.50
        let sip = sip_future_value(dec!(1_000), dec!(12), 12).unwrap();
        assert_eq!(sip.final_value, dec!(12682.50));
        assert_eq!(sip.total_investment, dec!(12_000));
        assert_eq!(sip.returns, dec!(682.50));
    }

    #[test]
    fn test_compare_sip_advantage() {
        let out = compare_sip(&SipComparisonInput {
            emi: dec!(21695.58),
            tenure: 240,
            sip_return_rate: dec!(12),
            inflation_rate: dec!(6),
        })
        .unwrap();
        let r = &out.result;
        assert_eq!(r.years, 20);
        assert_eq!(r.loan_total_repayment, dec!(5206939.20));
        assert_eq!(r.sip_advantage, r.sip.final_value - r.loan_total_repayment);
        assert!(r.sip_advantage > Decimal::ZERO);
        assert!(r.inflation_adjusted_advantage > r.sip_advantage);
    }

    #[test]
    fn test_partial_year_rounds_up() {
        let out = compare_sip(&SipComparisonInput {
            emi: dec!(5_000),
            tenure: 13,
            sip_return_rate: dec!(10),
            inflation_rate: dec!(6),
        })
        .unwrap();
        assert_eq!(out.result.years, 2);
    }

    #[test]
    fn test_default_inflation_is_six_percent() {
        let input: SipComparisonInput =
            serde_json::from_str(r#"{"emi":"5000","tenure":60,"sip_return_rate":"12"}"#).unwrap();
        assert_eq!(input.inflation_rate, dec!(6));
    }
}
