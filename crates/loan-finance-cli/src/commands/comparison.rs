use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use loan_finance_core::comparison::{analyze_inflation, compare_sip, InflationInput, SipComparisonInput};
use loan_finance_core::Months;

use super::required;
use crate::input;

/// Arguments for the EMI versus SIP comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SipArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly EMI to compare against investing
    #[arg(long)]
    pub emi: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// Expected SIP return, % p.a. (defaults to 12)
    #[arg(long)]
    pub sip_rate: Option<Decimal>,

    /// Inflation, % p.a.
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,
}

/// Arguments for the inflation impact analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InflationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, alias = "principal")]
    pub amount: Option<Decimal>,

    /// Monthly EMI
    #[arg(long)]
    pub emi: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// Inflation, % p.a.
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SipComparisonInput = match input::structured(args.input.as_deref())? {
        Some(request) => request,
        None => SipComparisonInput {
            emi: required(args.emi, "emi")?,
            tenure: required(args.tenure, "tenure")?,
            sip_return_rate: args.sip_rate.unwrap_or(dec!(12)),
            inflation_rate: args.inflation,
        },
    };
    let result = compare_sip(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_inflation(args: InflationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: InflationInput = match input::structured(args.input.as_deref())? {
        Some(request) => request,
        None => InflationInput {
            loan_amount: required(args.amount, "amount")?,
            emi: required(args.emi, "emi")?,
            tenure: required(args.tenure, "tenure")?,
            inflation_rate: args.inflation,
        },
    };
    let result = analyze_inflation(&request)?;
    Ok(serde_json::to_value(result)?)
}
