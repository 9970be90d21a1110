use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, RatePercent};

/// Fixed or floating pricing. Informational only: the schedule is computed
/// at the quoted rate either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    Fixed,
    Floating,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCategory {
    Secured,
    Unsecured,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Home,
    Vehicle,
    Gold,
    Personal,
    Education,
    Business,
    #[default]
    #[serde(other)]
    Other,
}

/// When top-up charges are paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeTiming {
    /// Paid out of pocket, reducing the cash actually received.
    #[default]
    Upfront,
    /// Financed into the merged loan principal.
    Added,
}

/// An additional loan layered onto an existing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopUpParameters {
    pub amount: Money,
    /// Rate for the merged (or separate top-up) loan, % p.a.
    pub rate: RatePercent,
    /// Tenure of the merged loan from today, months.
    pub tenure: Months,
    pub charges: Money,
    pub charges_timing: ChargeTiming,
    /// Installments already paid on the existing loan.
    pub emis_paid: Months,
}

/// The four flat charges deducted from disbursement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanCharges {
    pub processing: Money,
    pub file: Money,
    pub insurance: Money,
    pub commission: Money,
}

impl LoanCharges {
    pub fn total(&self) -> Money {
        self.processing + self.file + self.insurance + self.commission
    }
}

/// Everything a user can enter about a loan.
///
/// Every field defaults, so a half-filled form still deserialises; the
/// engine treats missing values as zero and returns degenerate results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanParameters {
    pub loan_amount: Money,
    /// Annual rate, % p.a.
    pub interest_rate: RatePercent,
    /// Months.
    pub tenure: Months,
    pub interest_type: InterestType,
    pub loan_category: LoanCategory,
    pub loan_type: LoanType,
    pub processing_charges: Money,
    pub file_charges: Money,
    pub insurance_charges: Money,
    pub commission_charges: Money,
    /// What the borrower ticked on the form; the computed benefit follows
    /// the loan type, this flag only drives a warning on mismatch.
    pub eligible_for_tax_deduction: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_up: Option<TopUpParameters>,
}

impl LoanParameters {
    pub fn charges(&self) -> LoanCharges {
        LoanCharges {
            processing: self.processing_charges,
            file: self.file_charges,
            insurance: self.insurance_charges,
            commission: self.commission_charges,
        }
    }

    /// Home loan used for demos and tests: 25L at 8.5% over 20 years.
    pub fn sample_home_loan() -> Self {
        LoanParameters {
            loan_amount: dec!(2_500_000),
            interest_rate: dec!(8.5),
            tenure: 240,
            interest_type: InterestType::Fixed,
            loan_category: LoanCategory::Secured,
            loan_type: LoanType::Home,
            processing_charges: dec!(25_000),
            file_charges: dec!(5_000),
            insurance_charges: dec!(15_000),
            commission_charges: dec!(10_000),
            eligible_for_tax_deduction: true,
            top_up: None,
        }
    }

    /// Whether enough has been entered to describe a loan.
    pub fn is_complete(&self) -> bool {
        self.loan_amount > Decimal::ZERO && self.tenure > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: LoanParameters =
            serde_json::from_str(r#"{"loan_amount":"500000","loan_type":"home"}"#).unwrap();
        assert_eq!(params.loan_amount, dec!(500000));
        assert_eq!(params.loan_type, LoanType::Home);
        assert_eq!(params.tenure, 0);
        assert_eq!(params.interest_type, InterestType::Unspecified);
        assert!(params.top_up.is_none());
        assert!(!params.is_complete());
    }

    #[test]
    fn test_unknown_loan_type_maps_to_other() {
        let params: LoanParameters =
            serde_json::from_str(r#"{"loan_type":"boat","interest_type":""}"#).unwrap();
        assert_eq!(params.loan_type, LoanType::Other);
        assert_eq!(params.interest_type, InterestType::Unspecified);
    }

    #[test]
    fn test_charges_total() {
        let params = LoanParameters {
            processing_charges: dec!(25000),
            file_charges: dec!(5000),
            insurance_charges: dec!(15000),
            commission_charges: dec!(10000),
            ..Default::default()
        };
        assert_eq!(params.charges().total(), dec!(55000));
    }
}
