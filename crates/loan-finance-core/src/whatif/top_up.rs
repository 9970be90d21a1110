//! Top-up loans: borrowing more against an existing loan, either merged into
//! one re-priced loan or taken as a separate second loan.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{build_schedule, compute_emi, ScheduleTotals};
use crate::error::LoanFinanceError;
use crate::loan::calculator::calculate;
use crate::loan::{ChargeTiming, LoanCalculationResult, LoanParameters};
use crate::types::{with_metadata, ComputationOutput, Money, Months, MAX_TENURE_MONTHS};
use crate::LoanResult;

/// Where an existing loan stands after some installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanStatus {
    pub principal_paid: Money,
    pub principal_remaining: Money,
    pub interest_paid: Money,
    pub interest_remaining: Money,
    pub tenure_covered: Months,
    pub tenure_remaining: Months,
}

/// Split the original schedule at `emis_paid`.
///
/// With nothing paid yet, or a count beyond the end of the schedule, the
/// loan is reported as untouched.
pub fn loan_status(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure: Months,
    emis_paid: Months,
) -> LoanResult<LoanStatus> {
    let schedule = build_schedule(principal, annual_rate_percent, tenure, &[])?;

    if emis_paid == 0 || emis_paid as usize > schedule.len() {
        return Ok(LoanStatus {
            principal_paid: Decimal::ZERO,
            principal_remaining: principal,
            interest_paid: Decimal::ZERO,
            interest_remaining: ScheduleTotals::from_schedule(&schedule).total_interest,
            tenure_covered: 0,
            tenure_remaining: tenure,
        });
    }

    let (paid, remaining) = schedule.split_at(emis_paid as usize);
    let paid = ScheduleTotals::from_schedule(paid);
    let remaining = ScheduleTotals::from_schedule(remaining);

    Ok(LoanStatus {
        principal_paid: paid.total_principal,
        principal_remaining: principal - paid.total_principal,
        interest_paid: paid.total_interest,
        interest_remaining: remaining.total_interest,
        tenure_covered: emis_paid,
        tenure_remaining: tenure.saturating_sub(emis_paid),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpOutput {
    pub status: LoanStatus,
    pub top_up_amount: Money,
    /// Top-up less upfront charges.
    pub cash_received: Money,
    pub merged_principal: Money,
    pub merged_emi: Money,
    pub merged_tenure: Months,
    pub merged_total_interest: Money,
    pub merged_total_repayment: Money,
    /// Remaining installment on the existing loan if left as is.
    pub existing_emi: Money,
    pub top_up_only_emi: Money,
    pub top_up_only_interest: Money,
    /// Existing EMI plus a separate top-up loan's EMI.
    pub separate_emi: Money,
    pub separate_total_cost: Money,
    pub merged_total_cost: Money,
    /// Positive when merging is cheaper than running two loans.
    pub merging_advantage: Money,
}

/// Evaluate the top-up described by `params.top_up` against the existing loan.
pub fn analyze_top_up(params: &LoanParameters) -> LoanResult<ComputationOutput<TopUpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let top_up = params
        .top_up
        .as_ref()
        .ok_or_else(|| LoanFinanceError::InvalidInput {
            field: "top_up".into(),
            reason: "Top-up parameters are required".into(),
        })?;

    if top_up.amount < Decimal::ZERO || top_up.charges < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "top_up".into(),
            reason: "Top-up amount and charges cannot be negative".into(),
        });
    }
    if top_up.tenure > MAX_TENURE_MONTHS {
        return Err(LoanFinanceError::InvalidTenure(top_up.tenure));
    }

    let status = loan_status(params.loan_amount, params.interest_rate, params.tenure, top_up.emis_paid)?;
    if top_up.emis_paid > 0 && status.tenure_covered == 0 {
        warnings.push(format!(
            "{} EMIs paid exceeds the {}-month tenure; treating the loan as untouched",
            top_up.emis_paid, params.tenure
        ));
    }
    if top_up.amount.is_zero() {
        warnings.push("No top-up amount; the merged loan is the remaining loan re-priced".into());
    }

    let merged_tenure = if top_up.tenure == 0 {
        status.tenure_remaining
    } else {
        top_up.tenure
    };

    let (financed_charges, upfront_charges) = match top_up.charges_timing {
        ChargeTiming::Added => (top_up.charges, Decimal::ZERO),
        ChargeTiming::Upfront => (Decimal::ZERO, top_up.charges),
    };

    let merged_principal = status.principal_remaining + top_up.amount + financed_charges;
    let merged_emi = compute_emi(merged_principal, top_up.rate, merged_tenure)?;
    let merged = ScheduleTotals::from_schedule(&build_schedule(
        merged_principal,
        top_up.rate,
        merged_tenure,
        &[],
    )?);

    let existing_emi = if status.tenure_remaining > 0 {
        compute_emi(status.principal_remaining, params.interest_rate, status.tenure_remaining)?
    } else {
        Decimal::ZERO
    };
    let (top_up_only_emi, top_up_only_interest) = if top_up.amount > Decimal::ZERO {
        let schedule = build_schedule(top_up.amount, top_up.rate, merged_tenure, &[])?;
        (
            compute_emi(top_up.amount, top_up.rate, merged_tenure)?,
            ScheduleTotals::from_schedule(&schedule).total_interest,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let separate_total_cost = status.principal_remaining
        + status.interest_remaining
        + top_up.amount
        + top_up_only_interest
        + top_up.charges;
    let merged_total_cost = merged.total_emi + upfront_charges;

    debug!(
        "analyze_top_up: merged principal {merged_principal} emi {merged_emi} vs separate emi {}",
        existing_emi + top_up_only_emi
    );

    let output = TopUpOutput {
        status,
        top_up_amount: top_up.amount,
        cash_received: top_up.amount - upfront_charges,
        merged_principal,
        merged_emi,
        merged_tenure,
        merged_total_interest: merged.total_interest,
        merged_total_repayment: merged.total_emi,
        existing_emi,
        top_up_only_emi,
        top_up_only_interest,
        separate_emi: existing_emi + top_up_only_emi,
        separate_total_cost,
        merged_total_cost,
        merging_advantage: separate_total_cost - merged_total_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Merged top-up versus existing loan plus separate top-up",
        &serde_json::json!({
            "loan_amount": params.loan_amount.to_string(),
            "interest_rate_pct": params.interest_rate.to_string(),
            "tenure_months": params.tenure,
            "top_up_amount": top_up.amount.to_string(),
            "top_up_rate_pct": top_up.rate.to_string(),
            "merged_tenure_months": merged_tenure,
            "charges_timing": top_up.charges_timing,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Blend a top-up into the original loan at the principal-weighted rate and
/// the longer of the two tenures, then recompute the whole loan.
pub fn merge_top_up(
    original: &LoanParameters,
    top_up_amount: Money,
    top_up_rate: Decimal,
    top_up_tenure: Months,
) -> LoanResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let total_amount = original.loan_amount + top_up_amount;
    let blended_rate = if total_amount > Decimal::ZERO {
        (original.loan_amount * original.interest_rate + top_up_amount * top_up_rate) / total_amount
    } else {
        original.interest_rate
    };

    let merged = LoanParameters {
        loan_amount: total_amount,
        interest_rate: blended_rate,
        tenure: original.tenure.max(top_up_tenure),
        top_up: None,
        ..original.clone()
    };

    let result = calculate(&merged, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Blended-rate top-up merge",
        &serde_json::json!({
            "merged_amount": total_amount.to_string(),
            "blended_rate_pct": blended_rate.to_string(),
            "merged_tenure_months": merged.tenure,
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::TopUpParameters;
    use rust_decimal_macros::dec;

    fn with_top_up(amount: Money, emis_paid: Months, timing: ChargeTiming) -> LoanParameters {
        LoanParameters {
            top_up: Some(TopUpParameters {
                amount,
                rate: dec!(9),
                tenure: 180,
                charges: dec!(5_000),
                charges_timing: timing,
                emis_paid,
            }),
            ..LoanParameters::sample_home_loan()
        }
    }

    #[test]
    fn test_status_after_payments() {
        let status = loan_status(dec!(2_500_000), dec!(8.5), 240, 60).unwrap();
        assert_eq!(status.tenure_covered, 60);
        assert_eq!(status.tenure_remaining, 180);
        assert_eq!(status.principal_paid + status.principal_remaining, dec!(2_500_000));
        assert!(status.interest_paid > status.principal_paid);
    }

    #[test]
    fn test_status_untouched_when_nothing_paid() {
        let status = loan_status(dec!(1_000_000), dec!(10), 120, 0).unwrap();
        assert_eq!(status.principal_remaining, dec!(1_000_000));
        assert_eq!(status.tenure_remaining, 120);

        let beyond = loan_status(dec!(1_000_000), dec!(10), 120, 500).unwrap();
        assert_eq!(beyond, status);
    }

    #[test]
    fn test_status_of_one_shot_loan() {
        // Zero tenure is a single lump-sum row; paying it clears the loan.
        let status = loan_status(dec!(100_000), dec!(10), 0, 1).unwrap();
        assert_eq!(status.tenure_covered, 1);
        assert_eq!(status.tenure_remaining, 0);
        assert_eq!(status.principal_remaining, Decimal::ZERO);
    }

    #[test]
    fn test_top_up_on_zero_tenure_loan() {
        let params = LoanParameters {
            tenure: 0,
            ..with_top_up(dec!(100_000), 1, ChargeTiming::Upfront)
        };
        let out = analyze_top_up(&params).unwrap();
        assert_eq!(out.result.existing_emi, Decimal::ZERO);
        assert_eq!(out.result.merged_principal, dec!(100_000));
        assert_eq!(out.result.merged_tenure, 180);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_merged_principal_includes_added_charges() {
        let upfront = analyze_top_up(&with_top_up(dec!(500_000), 60, ChargeTiming::Upfront)).unwrap();
        let added = analyze_top_up(&with_top_up(dec!(500_000), 60, ChargeTiming::Added)).unwrap();
        assert_eq!(
            added.result.merged_principal - upfront.result.merged_principal,
            dec!(5_000)
        );
        assert_eq!(upfront.result.cash_received, dec!(495_000));
        assert_eq!(added.result.cash_received, dec!(500_000));
    }

    #[test]
    fn test_separate_emi_is_sum_of_parts() {
        let out = analyze_top_up(&with_top_up(dec!(500_000), 60, ChargeTiming::Upfront)).unwrap();
        let r = &out.result;
        assert_eq!(r.separate_emi, r.existing_emi + r.top_up_only_emi);
        assert_eq!(r.merged_tenure, 180);
        assert!(r.merged_emi > r.existing_emi);
    }

    #[test]
    fn test_missing_top_up_is_error() {
        assert!(analyze_top_up(&LoanParameters::sample_home_loan()).is_err());
    }

    #[test]
    fn test_excessive_tenure_rejected() {
        let mut params = with_top_up(dec!(100_000), 0, ChargeTiming::Upfront);
        if let Some(top_up) = params.top_up.as_mut() {
            top_up.tenure = 600;
        }
        let err = analyze_top_up(&params).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidTenure(600)));
    }

    #[test]
    fn test_merge_top_up_blends_rate() {
        let original = LoanParameters {
            loan_amount: dec!(1_000_000),
            interest_rate: dec!(8),
            tenure: 120,
            ..Default::default()
        };
        let merged = merge_top_up(&original, dec!(1_000_000), dec!(10), 180).unwrap();
        // Equal weights: (8 + 10) / 2 = 9% over 180 months
        let expected = compute_emi(dec!(2_000_000), dec!(9), 180).unwrap();
        assert_eq!(merged.result.emi, expected);
        assert_eq!(merged.result.schedule.len(), 180);
    }
}
