use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Field names whose values are amounts of money rather than counts or rates.
const MONEY_FIELDS: &[&str] = &[
    "emi", "principal", "interest", "prepayment", "balance", "amount", "repayment", "charges",
    "benefit", "cost", "savings", "saved", "value", "investment", "returns", "advantage", "fees",
    "received", "paid", "remaining",
];

/// Whether `key` names a monetary column (`total_interest`, `new_emi`, ...).
pub fn is_money_field(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    if key.contains("rate") || key.contains("tenure") || key.starts_with("emis_") || key == "month" || key == "months" {
        return false;
    }
    key.split('_').any(|part| MONEY_FIELDS.contains(&part))
}

/// Render an amount with Indian digit grouping and two decimals: 2500000 → 25,00,000.00.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut pairs: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            pairs.push(&head[end - 2..end]);
            end -= 2;
        }
        pairs.push(&head[..end]);
        pairs.reverse();
        format!("{},{}", pairs.join(","), last_three)
    };

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Format a decimal string for display if it parses, otherwise return it unchanged.
pub fn format_money_str(raw: &str) -> String {
    Decimal::from_str(raw).map_or_else(|_| raw.to_string(), format_inr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_inr(dec!(2500000)), "25,00,000.00");
        assert_eq!(format_inr(dec!(21695.58)), "21,695.58");
        assert_eq!(format_inr(dec!(123456789.5)), "12,34,56,789.50");
        assert_eq!(format_inr(dec!(999)), "999.00");
        assert_eq!(format_inr(dec!(1000)), "1,000.00");
    }

    #[test]
    fn test_negative_and_rounding() {
        assert_eq!(format_inr(dec!(-15000)), "-15,000.00");
        assert_eq!(format_inr(dec!(0.005)), "0.01");
        assert_eq!(format_inr(dec!(-0.001)), "0.00");
    }

    #[test]
    fn test_money_field_detection() {
        assert!(is_money_field("total_interest"));
        assert!(is_money_field("emi"));
        assert!(is_money_field("cumulative_principal"));
        assert!(!is_money_field("interest_rate"));
        assert!(!is_money_field("effective_interest_rate"));
        assert!(!is_money_field("new_tenure"));
        assert!(!is_money_field("month"));
        assert!(!is_money_field("emis_paid"));
    }

    #[test]
    fn test_unparseable_passthrough() {
        assert_eq!(format_money_str("n/a"), "n/a");
        assert_eq!(format_money_str("1500000"), "15,00,000.00");
    }
}
