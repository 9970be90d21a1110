use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use loan_finance_core::amortization::{PrepaymentType, SolveFor};
use loan_finance_core::loan::{ChargeTiming, LoanParameters, TopUpParameters};
use loan_finance_core::whatif::{
    adjust, analyze_prepayment, analyze_top_up, merge_top_up, AdjustmentInput, Change,
    PrepaymentInput,
};
use loan_finance_core::Months;

use super::required;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReductionArg {
    Tenure,
    Emi,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VariableArg {
    Emi,
    Rate,
    Tenure,
}

impl From<VariableArg> for SolveFor {
    fn from(arg: VariableArg) -> Self {
        match arg {
            VariableArg::Emi => SolveFor::Emi,
            VariableArg::Rate => SolveFor::Rate,
            VariableArg::Tenure => SolveFor::Tenure,
        }
    }
}

/// Arguments for lump-sum prepayment analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PrepaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate, % p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// Lump sum to prepay
    #[arg(long)]
    pub lump_sum: Option<Decimal>,

    /// Month the lump sum is paid
    #[arg(long, default_value = "1")]
    pub month: Months,

    /// What the prepayment reduces
    #[arg(long, value_enum, default_value = "tenure")]
    pub reduce: ReductionArg,

    /// Foreclosure / prepayment charges
    #[arg(long, default_value = "0")]
    pub charges: Decimal,
}

/// Arguments for top-up analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TopUpArgs {
    /// Path to JSON loan parameters including a `top_up` block
    #[arg(long)]
    pub input: Option<String>,

    /// Existing loan amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Existing loan rate, % p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Existing loan tenure, months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// Installments already paid
    #[arg(long, default_value = "0")]
    pub emis_paid: Months,

    /// Additional amount borrowed
    #[arg(long)]
    pub top_up: Option<Decimal>,

    /// Top-up rate, % p.a.
    #[arg(long)]
    pub top_up_rate: Option<Decimal>,

    /// Merged tenure in months (0 keeps the remaining tenure)
    #[arg(long, default_value = "0")]
    pub top_up_tenure: Months,

    /// Top-up charges
    #[arg(long, default_value = "0")]
    pub top_up_charges: Decimal,

    /// Finance the charges into the merged loan instead of paying upfront
    #[arg(long)]
    pub add_charges: bool,

    /// Blend the top-up into the original loan at a weighted rate instead
    #[arg(long)]
    pub blend: bool,
}

/// Arguments for re-solving after changing one variable
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AdjustArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Base annual rate, % p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Base tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// New EMI
    #[arg(long, conflicts_with_all = ["new_rate", "new_tenure"])]
    pub new_emi: Option<Decimal>,

    /// New rate, % p.a.
    #[arg(long, conflicts_with = "new_tenure")]
    pub new_rate: Option<Decimal>,

    /// New tenure, months
    #[arg(long)]
    pub new_tenure: Option<Months>,

    /// Variable to keep at its base value
    #[arg(long, value_enum)]
    pub hold: Option<VariableArg>,
}

pub fn run_prepayment(args: PrepaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PrepaymentInput = match input::structured(args.input.as_deref())? {
        Some(request) => request,
        None => PrepaymentInput {
            principal: required(args.principal, "principal")?,
            interest_rate: required(args.rate, "rate")?,
            tenure: required(args.tenure, "tenure")?,
            lump_sum: required(args.lump_sum, "lump-sum")?,
            month: args.month,
            reduction: match args.reduce {
                ReductionArg::Tenure => PrepaymentType::ReduceTenure,
                ReductionArg::Emi => PrepaymentType::ReduceEmi,
            },
            prepayment_charges: args.charges,
        },
    };
    let result = analyze_prepayment(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_top_up(args: TopUpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = match input::structured(args.input.as_deref())? {
        Some(params) => params,
        None => LoanParameters {
            loan_amount: required(args.amount, "amount")?,
            interest_rate: required(args.rate, "rate")?,
            tenure: required(args.tenure, "tenure")?,
            top_up: Some(TopUpParameters {
                amount: required(args.top_up, "top-up")?,
                rate: required(args.top_up_rate, "top-up-rate")?,
                tenure: args.top_up_tenure,
                charges: args.top_up_charges,
                charges_timing: if args.add_charges {
                    ChargeTiming::Added
                } else {
                    ChargeTiming::Upfront
                },
                emis_paid: args.emis_paid,
            }),
            ..Default::default()
        },
    };

    if args.blend {
        let top_up = params.top_up.clone().ok_or("a top_up block is required for --blend")?;
        let result = merge_top_up(&params, top_up.amount, top_up.rate, top_up.tenure)?;
        return Ok(serde_json::to_value(result)?);
    }
    let result = analyze_top_up(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_adjust(args: AdjustArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AdjustmentInput = match input::structured(args.input.as_deref())? {
        Some(request) => request,
        None => {
            let change = match (args.new_emi, args.new_rate, args.new_tenure) {
                (Some(emi), _, _) => Change::Emi(emi),
                (_, Some(rate), _) => Change::Rate(rate),
                (_, _, Some(months)) => Change::Tenure(months),
                _ => return Err("one of --new-emi, --new-rate or --new-tenure is required".into()),
            };
            AdjustmentInput {
                principal: required(args.principal, "principal")?,
                interest_rate: required(args.rate, "rate")?,
                tenure: required(args.tenure, "tenure")?,
                change,
                hold: required(args.hold, "hold")?.into(),
            }
        }
    };
    let result = adjust(&request)?;
    Ok(serde_json::to_value(result)?)
}
