use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::years_spanned;
use crate::error::LoanFinanceError;
use crate::time_value::{annuity_future_value, grow_annually, monthly_rate};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Months, RatePercent};
use crate::LoanResult;

fn default_inflation() -> RatePercent {
    dec!(6)
}

/// `amount` carried forward `years` years at `inflation_percent` a year.
pub fn inflation_adjusted_value(
    amount: Money,
    years: u32,
    inflation_percent: RatePercent,
) -> LoanResult<Money> {
    grow_annually(amount, inflation_percent, years)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationInput {
    pub loan_amount: Money,
    pub emi: Money,
    pub tenure: Months,
    #[serde(default = "default_inflation")]
    pub inflation_rate: RatePercent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationOutput {
    pub total_repayment: Money,
    pub years: u32,
    pub inflation_adjusted_loan_amount: Money,
    /// Each EMI inflated monthly from the first installment, summed.
    pub inflation_adjusted_repayment: Money,
    /// Adjusted repayment less adjusted loan amount.
    pub real_interest_cost: Money,
}

/// The loan's cost with every installment restated for inflation.
pub fn analyze_inflation(input: &InflationInput) -> LoanResult<ComputationOutput<InflationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan_amount < Decimal::ZERO || input.emi < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount and EMI cannot be negative".into(),
        });
    }
    if input.inflation_rate < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidInput {
            field: "inflation_rate".into(),
            reason: "Inflation rate cannot be negative".into(),
        });
    }
    if input.emi.is_zero() || input.tenure == 0 {
        warnings.push("EMI and tenure are required for a meaningful result".into());
    }

    let years = years_spanned(input.tenure);
    let adjusted_loan =
        round_currency(inflation_adjusted_value(input.loan_amount, years, input.inflation_rate)?);
    // Σ emi·(1+i)^(t-1) for t in 1..=n is the annuity future value.
    let adjusted_repayment = round_currency(annuity_future_value(
        monthly_rate(input.inflation_rate),
        input.tenure,
        input.emi,
    )?);

    let output = InflationOutput {
        total_repayment: round_currency(input.emi * Decimal::from(input.tenure)),
        years,
        inflation_adjusted_loan_amount: adjusted_loan,
        inflation_adjusted_repayment: adjusted_repayment,
        real_interest_cost: adjusted_repayment - adjusted_loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Progressive monthly inflation of installments",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "emi": input.emi.to_string(),
            "tenure_months": input.tenure,
            "inflation_rate_pct": input.inflation_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
