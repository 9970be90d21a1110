use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::params::{LoanCharges, LoanParameters};
use super::tax::{is_tax_eligible, tax_benefit};
use crate::amortization::{build_schedule, compute_emi, EmiScheduleItem, ScheduleTotals};
use crate::types::{with_metadata, ComputationOutput, Money, RatePercent};
use crate::LoanResult;

/// Aggregate view of a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCalculationResult {
    pub emi: Money,
    /// Sum of every installment actually paid.
    pub total_repayment: Money,
    pub total_interest: Money,
    /// Principal less the flat charges; negative when charges exceed the loan.
    pub disbursed_amount: Money,
    pub schedule: Vec<EmiScheduleItem>,
    pub tax_benefit: Money,
    /// Lifetime interest as a percentage of principal (not annualised).
    pub effective_interest_rate: RatePercent,
}

/// Cash the borrower actually receives. Not floored at zero.
pub fn disbursed_amount(principal: Money, charges: &LoanCharges) -> Money {
    principal - charges.total()
}

/// Lifetime interest over principal, in percent; 0 when there is no principal.
pub fn effective_interest_rate(total_interest: Money, principal: Money) -> RatePercent {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total_interest / principal * dec!(100)
}

/// Compute EMI, schedule, totals, disbursement and tax benefit for a loan.
pub fn compute_loan(params: &LoanParameters) -> LoanResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = calculate(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI amortization (monthly rests)",
        &serde_json::json!({
            "loan_amount": params.loan_amount.to_string(),
            "interest_rate_pct": params.interest_rate.to_string(),
            "tenure_months": params.tenure,
            "loan_type": params.loan_type,
            "interest_type": params.interest_type,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Same as [`compute_loan`] without the envelope, for what-if modules that
/// recompute many variants.
pub(crate) fn calculate(
    params: &LoanParameters,
    warnings: &mut Vec<String>,
) -> LoanResult<LoanCalculationResult> {
    if !params.is_complete() {
        warnings.push("Loan amount and tenure must both be positive; result is empty".into());
    }

    let disbursed = disbursed_amount(params.loan_amount, &params.charges());
    if disbursed < Decimal::ZERO {
        warn!("compute_loan: charges exceed loan amount (disbursed {disbursed})");
        warnings.push(format!(
            "Charges exceed the loan amount; disbursed amount is negative ({disbursed})"
        ));
    }

    if params.eligible_for_tax_deduction && !is_tax_eligible(params.loan_type) {
        warnings.push(format!(
            "Tax deduction flagged but {:?} loans are not eligible; benefit set to 0",
            params.loan_type
        ));
    }

    let emi = compute_emi(params.loan_amount, params.interest_rate, params.tenure)?;
    let schedule = build_schedule(params.loan_amount, params.interest_rate, params.tenure, &[])?;
    let totals = ScheduleTotals::from_schedule(&schedule);

    Ok(LoanCalculationResult {
        emi,
        total_repayment: totals.total_emi,
        total_interest: totals.total_interest,
        disbursed_amount: disbursed,
        tax_benefit: tax_benefit(totals.total_principal, totals.total_interest, params.loan_type),
        effective_interest_rate: effective_interest_rate(totals.total_interest, params.loan_amount),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::params::LoanType;

    #[test]
    fn test_compute_loan_home() {
        let out = compute_loan(&LoanParameters::sample_home_loan()).unwrap();
        let r = &out.result;
        assert_eq!(r.emi, dec!(21695.58));
        assert_eq!(r.schedule.len(), 240);
        assert_eq!(r.disbursed_amount, dec!(2_445_000));
        assert_eq!(r.total_repayment, r.total_interest + dec!(2_500_000));
        // Lifetime principal and interest both exceed the caps
        assert_eq!(r.tax_benefit, dec!(105_000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_effective_rate_is_lifetime_ratio() {
        let out = compute_loan(&LoanParameters::sample_home_loan()).unwrap();
        let r = &out.result;
        assert_eq!(
            r.effective_interest_rate,
            r.total_interest / dec!(2_500_000) * dec!(100)
        );
        // Roughly 108% of principal over 20 years at 8.5%
        assert!(r.effective_interest_rate > dec!(100) && r.effective_interest_rate < dec!(110));
    }

    #[test]
    fn test_empty_form_is_degenerate_not_error() {
        let out = compute_loan(&LoanParameters::default()).unwrap();
        assert_eq!(out.result.emi, Decimal::ZERO);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.effective_interest_rate, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_negative_disbursement_warns() {
        let mut params = LoanParameters::sample_home_loan();
        params.loan_amount = dec!(40_000);
        let out = compute_loan(&params).unwrap();
        assert_eq!(out.result.disbursed_amount, dec!(-15_000));
        assert!(out.warnings.iter().any(|w| w.contains("negative")));
    }

    #[test]
    fn test_personal_loan_has_no_tax_benefit() {
        let mut params = LoanParameters::sample_home_loan();
        params.loan_type = LoanType::Personal;
        let out = compute_loan(&params).unwrap();
        assert_eq!(out.result.tax_benefit, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("not eligible")));
    }

    #[test]
    fn test_negative_rate_is_error() {
        let mut params = LoanParameters::sample_home_loan();
        params.interest_rate = dec!(-2);
        assert!(compute_loan(&params).is_err());
    }
}
