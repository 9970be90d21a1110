use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_finance_core::loan::catalogue::category_benefits;
use loan_finance_core::loan::charges::{late_fees, pre_closure_charges, DEFAULT_PENALTY_RATE};
use loan_finance_core::loan::tax::tax_benefit_breakdown;
use loan_finance_core::loan::{compute_loan, LoanCategory, LoanParameters, LoanType};
use loan_finance_core::Months;

use super::required;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Home,
    Vehicle,
    Gold,
    Personal,
    Education,
    Business,
    Other,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Home => LoanType::Home,
            LoanTypeArg::Vehicle => LoanType::Vehicle,
            LoanTypeArg::Gold => LoanType::Gold,
            LoanTypeArg::Personal => LoanType::Personal,
            LoanTypeArg::Education => LoanType::Education,
            LoanTypeArg::Business => LoanType::Business,
            LoanTypeArg::Other => LoanType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Secured,
    Unsecured,
}

impl From<CategoryArg> for LoanCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Secured => LoanCategory::Secured,
            CategoryArg::Unsecured => LoanCategory::Unsecured,
        }
    }
}

/// Arguments for a complete loan computation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Use the built-in 25L home loan example
    #[arg(long)]
    pub sample: bool,

    /// Loan amount
    #[arg(long, alias = "principal")]
    pub amount: Option<Decimal>,

    /// Annual interest rate, % p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<Months>,

    /// Loan type
    #[arg(long, value_enum)]
    pub loan_type: Option<LoanTypeArg>,

    /// Secured or unsecured
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Processing charges
    #[arg(long, default_value = "0")]
    pub processing_charges: Decimal,

    /// File charges
    #[arg(long, default_value = "0")]
    pub file_charges: Decimal,

    /// Insurance charges
    #[arg(long, default_value = "0")]
    pub insurance_charges: Decimal,

    /// Commission charges
    #[arg(long, default_value = "0")]
    pub commission_charges: Decimal,

    /// Claim the home / education loan tax deduction
    #[arg(long)]
    pub tax_deduction: bool,

    /// Omit the month-by-month schedule from the output
    #[arg(long)]
    pub no_schedule: bool,
}

/// Arguments for the tax benefit estimate
#[derive(Args)]
pub struct TaxArgs {
    /// Principal repaid
    #[arg(long)]
    pub principal_paid: Decimal,

    /// Interest paid
    #[arg(long)]
    pub interest_paid: Decimal,

    /// Loan type
    #[arg(long, value_enum, default_value = "home")]
    pub loan_type: LoanTypeArg,
}

/// Arguments for foreclosure and late-payment charges
#[derive(Args)]
pub struct ChargesArgs {
    /// Outstanding balance at foreclosure
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Monthly installment, for late fees
    #[arg(long)]
    pub emi: Option<Decimal>,

    /// Days the installment is late
    #[arg(long, default_value = "0")]
    pub days_late: u32,

    /// Penalty rate, % (defaults to 2)
    #[arg(long)]
    pub penalty_rate: Option<Decimal>,
}

/// Arguments for the category catalogue lookup
#[derive(Args)]
pub struct CatalogueArgs {
    /// Secured or unsecured
    #[arg(long, value_enum)]
    pub category: CategoryArg,

    /// Loan type
    #[arg(long, value_enum)]
    pub loan_type: LoanTypeArg,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = if args.sample {
        LoanParameters::sample_home_loan()
    } else if let Some(params) = input::structured(args.input.as_deref())? {
        params
    } else {
        let loan_type: LoanType = args.loan_type.map(Into::into).unwrap_or_default();
        LoanParameters {
            loan_amount: required(args.amount, "amount")?,
            interest_rate: required(args.rate, "rate")?,
            tenure: required(args.tenure, "tenure")?,
            loan_type,
            loan_category: args.category.map(Into::into).unwrap_or_default(),
            processing_charges: args.processing_charges,
            file_charges: args.file_charges,
            insurance_charges: args.insurance_charges,
            commission_charges: args.commission_charges,
            eligible_for_tax_deduction: args.tax_deduction,
            ..Default::default()
        }
    };

    let mut output = compute_loan(&params)?;
    if args.no_schedule {
        output.result.schedule.clear();
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let breakdown = tax_benefit_breakdown(args.principal_paid, args.interest_paid, args.loan_type.into());
    Ok(json!({ "result": breakdown }))
}

pub fn run_charges(args: ChargesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.balance.is_none() && args.emi.is_none() {
        return Err("provide --balance for pre-closure charges and/or --emi for late fees".into());
    }
    let rate = args.penalty_rate.unwrap_or(DEFAULT_PENALTY_RATE);
    Ok(json!({
        "result": {
            "penalty_rate": rate,
            "pre_closure_charges": args.balance.map(|b| pre_closure_charges(b, rate)),
            "late_fees": args.emi.map(|e| late_fees(e, args.days_late, rate)),
        }
    }))
}

pub fn run_catalogue(args: CatalogueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let benefits = category_benefits(args.category.into(), args.loan_type.into());
    Ok(json!({ "result": benefits }))
}
