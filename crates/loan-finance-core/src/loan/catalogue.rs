use serde::Serialize;

use super::params::{LoanCategory, LoanType};

/// Typical market terms for a category/type combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBenefits {
    pub interest_rate_range: &'static str,
    pub max_amount: &'static str,
    pub tenure: &'static str,
    pub tax_benefits: &'static str,
}

const fn terms(
    interest_rate_range: &'static str,
    max_amount: &'static str,
    tenure: &'static str,
    tax_benefits: &'static str,
) -> CategoryBenefits {
    CategoryBenefits {
        interest_rate_range,
        max_amount,
        tenure,
        tax_benefits,
    }
}

const DEFAULT_TERMS: CategoryBenefits = terms(
    "10% - 18%",
    "Varies by lender",
    "Up to 7 years",
    "Limited or no benefits",
);

/// Static lookup of typical terms; unlisted combinations get a generic entry.
pub fn category_benefits(category: LoanCategory, loan_type: LoanType) -> CategoryBenefits {
    use LoanCategory::*;
    use LoanType::*;

    match (category, loan_type) {
        (Secured, Home) => terms(
            "8.5% - 12%",
            "Up to ₹10 Cr",
            "Up to 30 years",
            "Principal: ₹1.5L, Interest: ₹2L",
        ),
        (Secured, Vehicle) => terms("7% - 15%", "Up to ₹1 Cr", "Up to 7 years", "Limited benefits"),
        (Secured, Gold) => terms(
            "10% - 16%",
            "Up to 75% of gold value",
            "Up to 3 years",
            "No specific benefits",
        ),
        (Unsecured, Personal) => terms("12% - 24%", "Up to ₹40L", "Up to 5 years", "No benefits"),
        (Unsecured, Education) => terms(
            "9% - 15%",
            "Up to ₹1.5 Cr",
            "Up to 15 years",
            "Interest deduction available",
        ),
        (Unsecured, Business) => terms(
            "11% - 20%",
            "Up to ₹5 Cr",
            "Up to 10 years",
            "Business expense deduction",
        ),
        _ => DEFAULT_TERMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_combination() {
        let home = category_benefits(LoanCategory::Secured, LoanType::Home);
        assert_eq!(home.interest_rate_range, "8.5% - 12%");
    }

    #[test]
    fn test_mismatched_category_falls_back() {
        let odd = category_benefits(LoanCategory::Unsecured, LoanType::Home);
        assert_eq!(odd, DEFAULT_TERMS);
        assert_eq!(
            category_benefits(LoanCategory::Unspecified, LoanType::Other).max_amount,
            "Varies by lender"
        );
    }
}
