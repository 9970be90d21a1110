//! Lump-sum prepayment impact: how much interest and time a one-off payment
//! saves, net of any foreclosure charges.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    build_schedule, compute_emi, EmiScheduleItem, PrepaymentScenario, PrepaymentType, ScheduleTotals,
};
use crate::error::LoanFinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Months, RatePercent};
use crate::LoanResult;

fn default_month() -> Months {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub principal: Money,
    /// Annual rate, % p.a.
    pub interest_rate: RatePercent,
    pub tenure: Months,
    pub lump_sum: Money,
    /// Month the lump sum is paid, alongside that month's EMI.
    #[serde(default = "default_month")]
    pub month: Months,
    pub reduction: PrepaymentType,
    #[serde(default)]
    pub prepayment_charges: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    pub original_emi: Money,
    pub original_tenure: Months,
    pub original_total_interest: Money,
    pub original_total_repayment: Money,
    /// Installment from the month after the prepayment onwards.
    pub new_emi: Money,
    pub new_tenure: Months,
    pub new_total_interest: Money,
    /// Installments plus the lump sum.
    pub new_total_repayment: Money,
    pub interest_saved: Money,
    pub tenure_reduction: Months,
    pub prepayment_charges: Money,
    /// Interest saved less charges; negative when the charges outweigh the saving.
    pub net_savings: Money,
    pub schedule: Vec<EmiScheduleItem>,
}

/// Compare a loan with and without a single lump-sum prepayment.
pub fn analyze_prepayment(input: &PrepaymentInput) -> LoanResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let original_emi = compute_emi(input.principal, input.interest_rate, input.tenure)?;
    let baseline = build_schedule(input.principal, input.interest_rate, input.tenure, &[])?;
    let base = ScheduleTotals::from_schedule(&baseline);

    let degenerate = input.lump_sum.is_zero() || input.principal <= Decimal::ZERO || input.tenure == 0;
    let schedule = if degenerate {
        warnings.push("No prepayment to apply; showing the unchanged loan".into());
        baseline
    } else {
        let event = PrepaymentScenario {
            month: input.month,
            amount: input.lump_sum,
            kind: input.reduction,
        };
        build_schedule(input.principal, input.interest_rate, input.tenure, &[event])?
    };
    let new = ScheduleTotals::from_schedule(&schedule);

    let new_emi = schedule
        .iter()
        .find(|row| row.month == input.month + 1)
        .map_or(original_emi, |row| row.emi);

    if input.reduction == PrepaymentType::ReduceEmi && new.months < base.months {
        warnings.push("Prepayment cleared the loan before the original end date".into());
    }

    let interest_saved = base.total_interest - new.total_interest;
    let net_savings = interest_saved - input.prepayment_charges;
    if !degenerate && net_savings < Decimal::ZERO {
        warnings.push(format!(
            "Prepayment charges of {} exceed the interest saved",
            input.prepayment_charges
        ));
    }

    let output = PrepaymentOutput {
        original_emi,
        original_tenure: base.months,
        original_total_interest: base.total_interest,
        original_total_repayment: base.total_emi,
        new_emi,
        new_tenure: new.months,
        new_total_interest: new.total_interest,
        new_total_repayment: new.total_emi + new.total_prepayment,
        interest_saved,
        tenure_reduction: base.months - new.months,
        prepayment_charges: input.prepayment_charges,
        net_savings,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lump-sum prepayment versus baseline amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "interest_rate_pct": input.interest_rate.to_string(),
            "tenure_months": input.tenure,
            "lump_sum": input.lump_sum.to_string(),
            "month": input.month,
            "reduction": input.reduction,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate(input: &PrepaymentInput) -> LoanResult<()> {
    if input.lump_sum < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "lump_sum".into(),
            reason: "Prepayment amount cannot be negative".into(),
        });
    }
    if input.prepayment_charges < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "prepayment_charges".into(),
            reason: "Charges cannot be negative".into(),
        });
    }
    if input.tenure > 0 && (input.month == 0 || input.month > input.tenure) {
        return Err(LoanFinanceError::InvalidInput {
            field: "month".into(),
            reason: format!("Prepayment month must be between 1 and {}", input.tenure),
        });
    }
    if input.principal > Decimal::ZERO && input.lump_sum > input.principal {
        return Err(LoanFinanceError::FinancialImpossibility(format!(
            "Prepayment of {} exceeds the loan principal of {}",
            input.lump_sum, input.principal
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn home_loan(lump_sum: Money, reduction: PrepaymentType) -> PrepaymentInput {
        PrepaymentInput {
            principal: dec!(2_500_000),
            interest_rate: dec!(8.5),
            tenure: 240,
            lump_sum,
            month: 1,
            reduction,
            prepayment_charges: Decimal::ZERO,
        }
    }

    #[test]
    fn test_reduce_tenure_shortens_loan() {
        let out = analyze_prepayment(&home_loan(dec!(500_000), PrepaymentType::ReduceTenure)).unwrap();
        let r = &out.result;
        assert!(r.new_tenure < 240);
        assert!(r.tenure_reduction > 0);
        assert!(r.interest_saved > Decimal::ZERO);
        assert_eq!(r.new_emi, r.original_emi);
    }

    #[test]
    fn test_reduce_emi_keeps_tenure() {
        let out = analyze_prepayment(&home_loan(dec!(500_000), PrepaymentType::ReduceEmi)).unwrap();
        let r = &out.result;
        assert_eq!(r.new_tenure, 240);
        assert_eq!(r.tenure_reduction, 0);
        assert_eq!(r.new_emi, dec!(17321.86));
        assert!(r.interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_reduce_tenure_saves_more_than_reduce_emi() {
        let tenure = analyze_prepayment(&home_loan(dec!(300_000), PrepaymentType::ReduceTenure)).unwrap();
        let emi = analyze_prepayment(&home_loan(dec!(300_000), PrepaymentType::ReduceEmi)).unwrap();
        assert!(tenure.result.interest_saved > emi.result.interest_saved);
    }

    #[test]
    fn test_charges_reduce_net_savings() {
        let mut input = home_loan(dec!(500_000), PrepaymentType::ReduceTenure);
        input.prepayment_charges = dec!(10_000);
        let out = analyze_prepayment(&input).unwrap();
        assert_eq!(out.result.net_savings, out.result.interest_saved - dec!(10_000));
    }

    #[test]
    fn test_zero_lump_sum_is_baseline() {
        let out = analyze_prepayment(&home_loan(Decimal::ZERO, PrepaymentType::ReduceTenure)).unwrap();
        assert_eq!(out.result.interest_saved, Decimal::ZERO);
        assert_eq!(out.result.new_tenure, 240);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_lump_sum_above_principal_rejected() {
        let err = analyze_prepayment(&home_loan(dec!(3_000_000), PrepaymentType::ReduceTenure)).unwrap_err();
        assert!(matches!(err, LoanFinanceError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        let mut input = home_loan(dec!(100_000), PrepaymentType::ReduceEmi);
        input.month = 241;
        assert!(analyze_prepayment(&input).is_err());
    }

    #[test]
    fn test_new_repayment_includes_lump_sum() {
        let out = analyze_prepayment(&home_loan(dec!(500_000), PrepaymentType::ReduceTenure)).unwrap();
        let r = &out.result;
        assert_eq!(r.new_total_repayment, dec!(2_500_000) + r.new_total_interest);
    }
}
