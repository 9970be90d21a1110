//! Change one of EMI / rate / tenure, hold a second, and let the solver
//! derive the third.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::solver::EMI_MATCH_TOLERANCE;
use crate::amortization::{build_schedule, compute_emi, solve, ScheduleTotals, SolveFor, SolverInput};
use crate::error::LoanFinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Months, RatePercent, MAX_TENURE_MONTHS};
use crate::LoanResult;

/// The new value the user dialled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variable", content = "value", rename_all = "snake_case")]
pub enum Change {
    Emi(Money),
    Rate(RatePercent),
    Tenure(Months),
}

impl Change {
    fn variable(&self) -> SolveFor {
        match self {
            Change::Emi(_) => SolveFor::Emi,
            Change::Rate(_) => SolveFor::Rate,
            Change::Tenure(_) => SolveFor::Tenure,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentInput {
    pub principal: Money,
    /// Base loan rate, % p.a.
    pub interest_rate: RatePercent,
    /// Base loan tenure, months.
    pub tenure: Months,
    pub change: Change,
    /// Variable kept at its base value; must differ from the changed one.
    pub hold: SolveFor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub emi: Money,
    pub interest_rate: RatePercent,
    pub tenure: Months,
    pub total_interest: Money,
    pub total_repayment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentOutput {
    pub base: LoanSummary,
    pub adjusted: LoanSummary,
    /// The variable that was derived.
    pub solved: SolveFor,
    pub emi_change: Money,
    pub interest_change: Money,
    pub repayment_change: Money,
}

fn summarize(principal: Money, rate: RatePercent, tenure: Months) -> LoanResult<LoanSummary> {
    let totals = ScheduleTotals::from_schedule(&build_schedule(principal, rate, tenure, &[])?);
    Ok(LoanSummary {
        emi: compute_emi(principal, rate, tenure)?,
        interest_rate: rate,
        tenure,
        total_interest: totals.total_interest,
        total_repayment: totals.total_emi,
    })
}

/// Re-solve a loan after one variable changes.
///
/// The adjusted summary is built from the solved triple, so when tenure is
/// derived from a target EMI the reported EMI is the one that tenure
/// actually requires (never above the target).
pub fn adjust(input: &AdjustmentInput) -> LoanResult<ComputationOutput<AdjustmentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let changed = input.change.variable();
    if changed == input.hold {
        return Err(LoanFinanceError::InvalidInput {
            field: "hold".into(),
            reason: format!("Cannot hold {changed:?} while changing it"),
        });
    }
    match input.change {
        Change::Emi(emi) if emi <= Decimal::ZERO => {
            return Err(LoanFinanceError::InvalidInput {
                field: "change".into(),
                reason: "EMI must be positive".into(),
            })
        }
        Change::Tenure(months) if months == 0 || months > MAX_TENURE_MONTHS => {
            return Err(LoanFinanceError::InvalidTenure(months))
        }
        _ => {}
    }

    let base = summarize(input.principal, input.interest_rate, input.tenure)?;

    let solve_for = [SolveFor::Emi, SolveFor::Rate, SolveFor::Tenure]
        .into_iter()
        .find(|v| *v != changed && *v != input.hold)
        .unwrap_or(SolveFor::Emi);

    let mut request = SolverInput {
        solve_for,
        principal: input.principal,
        emi: Some(base.emi),
        interest_rate: Some(input.interest_rate),
        tenure: Some(input.tenure),
    };
    match input.change {
        Change::Emi(emi) => request.emi = Some(emi),
        Change::Rate(rate) => request.interest_rate = Some(rate),
        Change::Tenure(months) => request.tenure = Some(months),
    }

    let solution = solve(&request)?;
    let adjusted = summarize(input.principal, solution.interest_rate, solution.tenure)?;

    // Tenure moves in whole months, so only an EMI above the target is a miss there.
    let target = solution.emi;
    let missed = match solve_for {
        SolveFor::Rate => (adjusted.emi - target).abs() >= EMI_MATCH_TOLERANCE,
        SolveFor::Tenure => adjusted.emi > target,
        SolveFor::Emi => false,
    };
    if missed {
        warnings.push(format!(
            "Target EMI {target} is not reachable; closest achievable is {}",
            adjusted.emi
        ));
    }

    let output = AdjustmentOutput {
        emi_change: adjusted.emi - base.emi,
        interest_change: adjusted.total_interest - base.total_interest,
        repayment_change: adjusted.total_repayment - base.total_repayment,
        base,
        adjusted,
        solved: solve_for,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Solver-driven loan adjustment",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "interest_rate_pct": input.interest_rate.to_string(),
            "tenure_months": input.tenure,
            "change": input.change,
            "hold": input.hold,
        }),
        warnings,
        elapsed,
        output,
    ))
}
