use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use loan_finance_core::amortization::{
    build_schedule, compute_emi, rate_from_emi, solve, tenure_from_emi, PrepaymentScenario,
    PrepaymentType, ScheduleTotals, SolveFor, SolverInput,
};
use loan_finance_core::Months;

use super::required;
use crate::input;

/// Principal, rate and tenure: the three values most commands start from.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanTermsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate, % p.a.
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,
}

#[derive(Deserialize)]
struct LoanTerms {
    principal: Decimal,
    interest_rate: Decimal,
    tenure: Months,
    #[serde(default)]
    prepayments: Vec<PrepaymentScenario>,
}

impl LoanTermsArgs {
    fn resolve(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        if let Some(terms) = input::structured(self.input.as_deref())? {
            return Ok(terms);
        }
        Ok(LoanTerms {
            principal: required(self.principal, "principal")?,
            interest_rate: required(self.rate, "rate")?,
            tenure: required(self.tenure, "tenure")?,
            prepayments: Vec::new(),
        })
    }
}

/// Arguments for a full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: LoanTermsArgs,

    /// Lump-sum prepayment as MONTH:AMOUNT[:reduce-tenure|reduce-emi]; repeatable
    #[arg(long = "prepay", value_parser = parse_prepayment)]
    pub prepayments: Vec<PrepaymentScenario>,
}

/// Arguments for solving tenure from an EMI
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TenureArgs {
    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Decimal,

    /// Annual interest rate, % p.a.
    #[arg(long)]
    pub rate: Decimal,

    /// Monthly installment
    #[arg(long)]
    pub emi: Decimal,
}

/// Arguments for solving the rate from an EMI
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RateArgs {
    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Months,

    /// Monthly installment
    #[arg(long)]
    pub emi: Decimal,
}

/// Arguments for the generic three-variable solver
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SolveArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Variable to derive: emi, tenure or rate
    #[arg(long)]
    pub solve_for: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Monthly installment
    #[arg(long)]
    pub emi: Option<Decimal>,

    /// Annual interest rate, % p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,
}

fn parse_prepayment(raw: &str) -> Result<PrepaymentScenario, String> {
    let mut parts = raw.split(':');
    let month = parts
        .next()
        .and_then(|m| m.trim().parse::<Months>().ok())
        .ok_or_else(|| format!("invalid prepayment month in '{raw}'"))?;
    let amount = parts
        .next()
        .and_then(|a| a.trim().parse::<Decimal>().ok())
        .ok_or_else(|| format!("invalid prepayment amount in '{raw}'"))?;
    let kind = match parts.next().map(str::trim) {
        None | Some("reduce-tenure") | Some("tenure") => PrepaymentType::ReduceTenure,
        Some("reduce-emi") | Some("emi") => PrepaymentType::ReduceEmi,
        Some(other) => return Err(format!("unknown prepayment type '{other}'")),
    };
    Ok(PrepaymentScenario { month, amount, kind })
}

fn parse_solve_for(raw: &str) -> Result<SolveFor, Box<dyn std::error::Error>> {
    match raw.to_ascii_lowercase().as_str() {
        "emi" => Ok(SolveFor::Emi),
        "tenure" => Ok(SolveFor::Tenure),
        "rate" | "interest_rate" => Ok(SolveFor::Rate),
        other => Err(format!("--solve-for must be emi, tenure or rate (got '{other}')").into()),
    }
}

pub fn run_emi(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.resolve()?;
    let emi = compute_emi(terms.principal, terms.interest_rate, terms.tenure)?;
    Ok(json!({
        "result": {
            "emi": emi,
            "principal": terms.principal,
            "interest_rate": terms.interest_rate,
            "tenure": terms.tenure,
        }
    }))
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut terms = args.terms.resolve()?;
    terms.prepayments.extend(args.prepayments);

    let schedule = build_schedule(
        terms.principal,
        terms.interest_rate,
        terms.tenure,
        &terms.prepayments,
    )?;
    let totals = ScheduleTotals::from_schedule(&schedule);
    Ok(json!({
        "result": {
            "emi": compute_emi(terms.principal, terms.interest_rate, terms.tenure)?,
            "months": totals.months,
            "total_emi": totals.total_emi,
            "total_interest": totals.total_interest,
            "total_principal": totals.total_principal,
            "total_prepayment": totals.total_prepayment,
            "schedule": schedule,
        }
    }))
}

pub fn run_tenure(args: TenureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tenure = tenure_from_emi(args.principal, args.rate, args.emi)?;
    Ok(json!({
        "result": {
            "tenure": tenure,
            "years": format!("{} years {} months", tenure / 12, tenure % 12),
            "emi_at_tenure": compute_emi(args.principal, args.rate, tenure)?,
        }
    }))
}

pub fn run_rate(args: RateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solution = rate_from_emi(args.principal, args.tenure, args.emi)?;
    let mut warnings = Vec::new();
    if !solution.within_tolerance {
        warnings.push(format!(
            "No rate between 0.1% and 30% reproduces an EMI of {}; closest is {}",
            args.emi, solution.implied_emi
        ));
    }
    Ok(json!({ "result": solution, "warnings": warnings }))
}

pub fn run_solve(args: SolveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SolverInput = match input::structured(args.input.as_deref())? {
        Some(request) => request,
        None => SolverInput {
            solve_for: parse_solve_for(&required(args.solve_for, "solve-for")?)?,
            principal: required(args.principal, "principal")?,
            emi: args.emi,
            interest_rate: args.rate,
            tenure: args.tenure,
        },
    };
    let solution = solve(&request)?;
    Ok(json!({ "result": solution }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_prepayment_defaults_to_reduce_tenure() {
        let p = parse_prepayment("12:50000").unwrap();
        assert_eq!(p.month, 12);
        assert_eq!(p.amount, dec!(50000));
        assert_eq!(p.kind, PrepaymentType::ReduceTenure);
    }

    #[test]
    fn test_parse_prepayment_reduce_emi() {
        let p = parse_prepayment("3:1000.50:reduce-emi").unwrap();
        assert_eq!(p.kind, PrepaymentType::ReduceEmi);
        assert_eq!(p.amount, dec!(1000.50));
    }

    #[test]
    fn test_parse_prepayment_rejects_garbage() {
        assert!(parse_prepayment("x:100").is_err());
        assert!(parse_prepayment("3:100:sideways").is_err());
    }

    #[test]
    fn test_parse_solve_for() {
        assert_eq!(parse_solve_for("Rate").unwrap(), SolveFor::Rate);
        assert!(parse_solve_for("principal").is_err());
    }
}
