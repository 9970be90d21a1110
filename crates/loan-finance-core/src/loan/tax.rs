use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::params::LoanType;
use crate::types::{Money, Rate};

/// Yearly deduction cap on principal repaid (Section 80C).
pub const PRINCIPAL_DEDUCTION_CAP: Money = dec!(150_000);
/// Yearly deduction cap on interest paid (Section 24).
pub const INTEREST_DEDUCTION_CAP: Money = dec!(200_000);
/// Marginal slab the benefit is valued at.
pub const MARGINAL_TAX_RATE: Rate = dec!(0.30);

const ELIGIBLE_LOAN_TYPES: [LoanType; 2] = [LoanType::Home, LoanType::Education];

pub fn is_tax_eligible(loan_type: LoanType) -> bool {
    ELIGIBLE_LOAN_TYPES.contains(&loan_type)
}

/// How a tax benefit was arrived at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBenefit {
    pub eligible: bool,
    pub deductible_principal: Money,
    pub deductible_interest: Money,
    pub tax_rate: Rate,
    pub benefit: Money,
}

pub fn tax_benefit_breakdown(
    cumulative_principal: Money,
    cumulative_interest: Money,
    loan_type: LoanType,
) -> TaxBenefit {
    if !is_tax_eligible(loan_type) {
        return TaxBenefit {
            eligible: false,
            deductible_principal: Decimal::ZERO,
            deductible_interest: Decimal::ZERO,
            tax_rate: MARGINAL_TAX_RATE,
            benefit: Decimal::ZERO,
        };
    }

    let deductible_principal = cumulative_principal.clamp(Decimal::ZERO, PRINCIPAL_DEDUCTION_CAP);
    let deductible_interest = cumulative_interest.clamp(Decimal::ZERO, INTEREST_DEDUCTION_CAP);

    TaxBenefit {
        eligible: true,
        deductible_principal,
        deductible_interest,
        tax_rate: MARGINAL_TAX_RATE,
        benefit: (deductible_principal + deductible_interest) * MARGINAL_TAX_RATE,
    }
}

/// Tax saved on the capped principal and interest deductions; zero for
/// loan types outside the allow-list.
pub fn tax_benefit(cumulative_principal: Money, cumulative_interest: Money, loan_type: LoanType) -> Money {
    tax_benefit_breakdown(cumulative_principal, cumulative_interest, loan_type).benefit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benefit_capped() {
        let benefit = tax_benefit(dec!(500_000), dec!(500_000), LoanType::Home);
        assert_eq!(benefit, dec!(105_000));
    }

    #[test]
    fn test_benefit_below_caps() {
        // (100k + 50k) * 30%
        let benefit = tax_benefit(dec!(100_000), dec!(50_000), LoanType::Education);
        assert_eq!(benefit, dec!(45_000));
    }

    #[test]
    fn test_ineligible_type() {
        assert_eq!(tax_benefit(dec!(500_000), dec!(500_000), LoanType::Personal), Decimal::ZERO);
        assert!(!is_tax_eligible(LoanType::Vehicle));
        assert!(is_tax_eligible(LoanType::Home));
    }

    #[test]
    fn test_breakdown_fields() {
        let b = tax_benefit_breakdown(dec!(200_000), dec!(120_000), LoanType::Home);
        assert!(b.eligible);
        assert_eq!(b.deductible_principal, dec!(150_000));
        assert_eq!(b.deductible_interest, dec!(120_000));
        assert_eq!(b.benefit, dec!(81_000));
    }
}
