use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_finance_core::amortization::{self, PrepaymentScenario, SolverInput};
use loan_finance_core::Months;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn render<T: serde::Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct LoanTerms {
    principal: Decimal,
    interest_rate: Decimal,
    tenure: Months,
    #[serde(default)]
    prepayments: Vec<PrepaymentScenario>,
}

#[derive(Deserialize)]
struct EmiTarget {
    principal: Decimal,
    emi: Decimal,
    #[serde(default)]
    interest_rate: Decimal,
    #[serde(default)]
    tenure: Months,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let emi = amortization::compute_emi(terms.principal, terms.interest_rate, terms.tenure)
        .map_err(to_napi_error)?;
    render(&serde_json::json!({ "emi": emi }))
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let schedule = amortization::build_schedule(
        terms.principal,
        terms.interest_rate,
        terms.tenure,
        &terms.prepayments,
    )
    .map_err(to_napi_error)?;
    render(&schedule)
}

#[napi]
pub fn tenure_from_emi(input_json: String) -> NapiResult<String> {
    let target: EmiTarget = parse(&input_json)?;
    let tenure = amortization::tenure_from_emi(target.principal, target.interest_rate, target.emi)
        .map_err(to_napi_error)?;
    render(&serde_json::json!({ "tenure": tenure }))
}

#[napi]
pub fn rate_from_emi(input_json: String) -> NapiResult<String> {
    let target: EmiTarget = parse(&input_json)?;
    let solution = amortization::rate_from_emi(target.principal, target.tenure, target.emi)
        .map_err(to_napi_error)?;
    render(&solution)
}

#[napi]
pub fn solve_loan(input_json: String) -> NapiResult<String> {
    let input: SolverInput = parse(&input_json)?;
    render(&amortization::solve(&input).map_err(to_napi_error)?)
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_loan(input_json: String) -> NapiResult<String> {
    let params: loan_finance_core::loan::LoanParameters = parse(&input_json)?;
    render(&loan_finance_core::loan::compute_loan(&params).map_err(to_napi_error)?)
}

// ---------------------------------------------------------------------------
// What-if
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_prepayment(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::whatif::PrepaymentInput = parse(&input_json)?;
    render(&loan_finance_core::whatif::analyze_prepayment(&input).map_err(to_napi_error)?)
}

#[napi]
pub fn analyze_top_up(input_json: String) -> NapiResult<String> {
    let params: loan_finance_core::loan::LoanParameters = parse(&input_json)?;
    render(&loan_finance_core::whatif::analyze_top_up(&params).map_err(to_napi_error)?)
}

#[napi]
pub fn adjust_loan(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::whatif::AdjustmentInput = parse(&input_json)?;
    render(&loan_finance_core::whatif::adjust(&input).map_err(to_napi_error)?)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_sip(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::comparison::SipComparisonInput = parse(&input_json)?;
    render(&loan_finance_core::comparison::compare_sip(&input).map_err(to_napi_error)?)
}

#[napi]
pub fn analyze_inflation(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::comparison::InflationInput = parse(&input_json)?;
    render(&loan_finance_core::comparison::analyze_inflation(&input).map_err(to_napi_error)?)
}
