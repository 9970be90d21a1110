use log::{debug, trace};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::emi::{compute_emi, interest_only_payment, validate_rate};
use crate::error::LoanFinanceError;
use crate::time_value::monthly_rate;
use crate::types::{Money, Months, RatePercent, MAX_TENURE_MONTHS};
use crate::LoanResult;

/// Lower bound of the rate search, % p.a.
pub const MIN_SOLVED_RATE: Decimal = dec!(0.1);
/// Upper bound of the rate search, % p.a.
pub const MAX_SOLVED_RATE: Decimal = dec!(30);
/// The rate search always runs exactly this many bisection steps.
pub const RATE_BISECTION_ITERATIONS: u32 = 100;
/// An implied EMI within this many currency units of the target counts as a match.
pub const EMI_MATCH_TOLERANCE: Money = dec!(1);

/// Months needed to repay `principal` at `annual_rate_percent` with a fixed `emi`.
///
/// Saturates at [`MAX_TENURE_MONTHS`] when the EMI does not cover the monthly
/// interest (including a zero or negative EMI), and never returns less than 1.
/// Because EMIs are quoted to the cent, the answer is the shortest tenure whose
/// cent-rounded EMI does not exceed `emi`; `tenure_from_emi(P, r, compute_emi(P, r, n)) == n`.
pub fn tenure_from_emi(
    principal: Money,
    annual_rate_percent: RatePercent,
    emi: Money,
) -> LoanResult<Months> {
    validate_rate(annual_rate_percent)?;

    if emi <= Decimal::ZERO {
        debug!("tenure_from_emi: non-positive emi {emi}, saturating at {MAX_TENURE_MONTHS}");
        return Ok(MAX_TENURE_MONTHS);
    }
    if principal <= Decimal::ZERO {
        return Ok(1);
    }

    if annual_rate_percent.is_zero() {
        return Ok(principal
            .checked_div(emi)
            .map_or(MAX_TENURE_MONTHS, |months| clamp_tenure(months.ceil())));
    }

    let interest_only = interest_only_payment(principal, annual_rate_percent);
    if emi <= interest_only {
        debug!(
            "tenure_from_emi: emi {emi} does not cover monthly interest {interest_only}, saturating"
        );
        return Ok(MAX_TENURE_MONTHS);
    }

    let m = monthly_rate(annual_rate_percent);
    let Some(ratio) = interest_only
        .checked_div(emi - interest_only)
        .and_then(|r| r.checked_add(Decimal::ONE))
    else {
        debug!("tenure_from_emi: emi {emi} within rounding of interest-only, saturating");
        return Ok(MAX_TENURE_MONTHS);
    };
    let growth = Decimal::ONE + m;
    let exact = match (ratio.checked_ln(), growth.checked_ln()) {
        (Some(num), Some(den)) if !den.is_zero() => num / den,
        _ => {
            return Err(LoanFinanceError::InvalidInput {
                field: "emi".into(),
                reason: "Tenure logarithm is undefined for these inputs".into(),
            })
        }
    };

    let mut months = clamp_tenure(exact.ceil());
    trace!("tenure_from_emi: closed form {exact} -> {months}");

    // Snap to the cent-rounded EMI grid.
    while months > 1 && compute_emi(principal, annual_rate_percent, months - 1)? <= emi {
        months -= 1;
    }
    while months < MAX_TENURE_MONTHS && compute_emi(principal, annual_rate_percent, months)? > emi {
        months += 1;
    }

    Ok(months)
}

fn clamp_tenure(months: Decimal) -> Months {
    if months <= Decimal::ONE {
        return 1;
    }
    months
        .to_u32()
        .map_or(MAX_TENURE_MONTHS, |m| m.min(MAX_TENURE_MONTHS))
}

/// Outcome of solving for the interest rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSolution {
    /// Annual rate, % p.a., within `[MIN_SOLVED_RATE, MAX_SOLVED_RATE]`.
    pub rate: RatePercent,
    /// EMI the solved rate produces.
    pub implied_emi: Money,
    pub iterations: u32,
    /// Whether `implied_emi` lands within [`EMI_MATCH_TOLERANCE`] of the target.
    pub within_tolerance: bool,
}

/// Annual rate at which `principal` over `tenure_months` costs `emi` a month.
///
/// There is no closed form, so this bisects the monotonic EMI(rate) curve
/// over `[0.1%, 30%]` for a fixed [`RATE_BISECTION_ITERATIONS`] steps.
/// There is deliberately no early exit once the EMI lands within
/// [`EMI_MATCH_TOLERANCE`]: every search runs all steps, so `iterations` is
/// always the full count and the rate is resolved well past the cent.
/// Targets outside the bracket pin to its edge and report
/// `within_tolerance = false`.
pub fn rate_from_emi(principal: Money, tenure_months: Months, emi: Money) -> LoanResult<RateSolution> {
    if principal <= Decimal::ZERO || emi <= Decimal::ZERO || tenure_months == 0 {
        debug!("rate_from_emi: degenerate input, returning floor rate");
        return Ok(RateSolution {
            rate: MIN_SOLVED_RATE,
            implied_emi: compute_emi(principal, MIN_SOLVED_RATE, tenure_months)?,
            iterations: 0,
            within_tolerance: false,
        });
    }

    let mut low = MIN_SOLVED_RATE;
    let mut high = MAX_SOLVED_RATE;
    let mut mid = (low + high) / dec!(2);

    for _ in 0..RATE_BISECTION_ITERATIONS {
        mid = (low + high) / dec!(2);
        let calculated = compute_emi(principal, mid, tenure_months)?;
        if calculated < emi {
            low = mid;
        } else {
            high = mid;
        }
    }

    let rate = mid.clamp(MIN_SOLVED_RATE, MAX_SOLVED_RATE);
    let implied_emi = compute_emi(principal, rate, tenure_months)?;
    let within_tolerance = (implied_emi - emi).abs() < EMI_MATCH_TOLERANCE;
    debug!("rate_from_emi: target={emi} rate={rate} implied={implied_emi} matched={within_tolerance}");

    Ok(RateSolution {
        rate,
        implied_emi,
        iterations: RATE_BISECTION_ITERATIONS,
        within_tolerance,
    })
}

/// Which of the three loan variables to derive from the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveFor {
    Emi,
    Tenure,
    Rate,
}

/// Principal plus whichever two of EMI / rate / tenure are known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverInput {
    pub solve_for: SolveFor,
    pub principal: Money,
    #[serde(default)]
    pub emi: Option<Money>,
    #[serde(default)]
    pub interest_rate: Option<RatePercent>,
    #[serde(default)]
    pub tenure: Option<Months>,
}

/// A consistent (EMI, rate, tenure) triple for the principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub principal: Money,
    pub emi: Money,
    pub interest_rate: RatePercent,
    pub tenure: Months,
    pub solved: SolveFor,
}

/// Derive the missing variable named by `solve_for`.
pub fn solve(input: &SolverInput) -> LoanResult<Solution> {
    let principal = input.principal;
    let (emi, interest_rate, tenure) = match input.solve_for {
        SolveFor::Emi => {
            let rate = require(input.interest_rate, "interest_rate")?;
            let tenure = require(input.tenure, "tenure")?;
            (compute_emi(principal, rate, tenure)?, rate, tenure)
        }
        SolveFor::Tenure => {
            let rate = require(input.interest_rate, "interest_rate")?;
            let emi = require(input.emi, "emi")?;
            (emi, rate, tenure_from_emi(principal, rate, emi)?)
        }
        SolveFor::Rate => {
            let emi = require(input.emi, "emi")?;
            let tenure = require(input.tenure, "tenure")?;
            (emi, rate_from_emi(principal, tenure, emi)?.rate, tenure)
        }
    };

    Ok(Solution {
        principal,
        emi,
        interest_rate,
        tenure,
        solved: input.solve_for,
    })
}

fn require<T>(value: Option<T>, field: &str) -> LoanResult<T> {
    value.ok_or_else(|| LoanFinanceError::InvalidInput {
        field: field.into(),
        reason: "Required for the selected solve_for".into(),
    })
}
