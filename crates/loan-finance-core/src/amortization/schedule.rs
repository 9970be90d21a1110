use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::emi::{compute_emi, validate_rate, validate_tenure};
use crate::time_value::monthly_rate;
use crate::types::{round_currency, Money, Months, RatePercent};
use crate::LoanResult;

/// What a lump-sum prepayment is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepaymentType {
    /// Keep the EMI, finish the loan earlier.
    ReduceTenure,
    /// Keep the end date, lower the EMI for the months that follow.
    ReduceEmi,
}

/// A lump sum paid on top of the regular installment in a given month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentScenario {
    pub month: Months,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: PrepaymentType,
}

/// One month of an amortization schedule.
///
/// `emi` is the regular installment paid that month; any lump sum applied in
/// the same month is reported in `prepayment` and already included in
/// `principal`, so `principal + interest == emi + prepayment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiScheduleItem {
    pub month: Months,
    pub emi: Money,
    pub principal: Money,
    pub interest: Money,
    #[serde(default, skip_serializing_if = "Decimal::is_zero")]
    pub prepayment: Money,
    pub balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Totals over a schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub months: Months,
    pub total_emi: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_prepayment: Money,
}

impl ScheduleTotals {
    pub fn from_schedule(schedule: &[EmiScheduleItem]) -> Self {
        schedule.iter().fold(
            ScheduleTotals {
                months: schedule.len() as Months,
                ..Default::default()
            },
            |mut acc, row| {
                acc.total_emi += row.emi;
                acc.total_interest += row.interest;
                acc.total_principal += row.principal;
                acc.total_prepayment += row.prepayment;
                acc
            },
        )
    }
}

/// Build the month-by-month amortization schedule, applying any prepayments.
///
/// The schedule starts at month 1, never runs past `tenure_months` and stops
/// as soon as the balance is retired. Interest is rounded to the cent each
/// month so the balance stays exact; the row that retires the loan pays
/// exactly the outstanding balance plus that month's interest. When the
/// nominal tenure is reached with cents left over from EMI rounding, the final
/// installment absorbs them.
///
/// A reduce-EMI prepayment in month `t` spreads the closing balance over
/// `tenure_months - t + 1` months. Only `tenure_months - t` installments are
/// left, so the final month settles what that leaves outstanding.
///
/// Prepayments are looked up by month: several events in the same month are
/// summed and the last one's type applies. Events outside `1..=tenure_months`
/// are ignored.
pub fn build_schedule(
    principal: Money,
    annual_rate_percent: RatePercent,
    tenure_months: Months,
    prepayments: &[PrepaymentScenario],
) -> LoanResult<Vec<EmiScheduleItem>> {
    validate_rate(annual_rate_percent)?;
    validate_tenure(tenure_months)?;

    if principal <= Decimal::ZERO {
        return Ok(Vec::new());
    }
    if tenure_months == 0 {
        let lump = round_currency(principal);
        return Ok(vec![EmiScheduleItem {
            month: 1,
            emi: lump,
            principal: lump,
            interest: Decimal::ZERO,
            prepayment: Decimal::ZERO,
            balance: Decimal::ZERO,
            cumulative_interest: Decimal::ZERO,
            cumulative_principal: lump,
        }]);
    }

    let rate = monthly_rate(annual_rate_percent);
    let mut balance = round_currency(principal);
    let mut emi = compute_emi(principal, annual_rate_percent, tenure_months)?;
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(tenure_months as usize);

    debug!(
        "build_schedule: principal={principal} rate={annual_rate_percent}% tenure={tenure_months} emi={emi} prepayments={}",
        prepayments.len()
    );

    let mut month: Months = 1;
    while month <= tenure_months && balance > Decimal::ZERO {
        let interest = round_currency(balance * rate);
        let mut installment = emi;
        let mut scheduled_principal = installment - interest;

        let (extra, kind) = prepayment_for_month(prepayments, month);

        let prepayment = if scheduled_principal >= balance {
            // The regular installment alone closes the loan.
            scheduled_principal = balance;
            installment = interest + balance;
            Decimal::ZERO
        } else {
            extra.min(balance - scheduled_principal)
        };

        let mut closing = balance - scheduled_principal - prepayment;

        if month == tenure_months && closing > Decimal::ZERO {
            trace!("build_schedule: settling rounding residue {closing} in final month");
            scheduled_principal += closing;
            installment += closing;
            closing = Decimal::ZERO;
        }

        if kind == Some(PrepaymentType::ReduceEmi) && closing > Decimal::ZERO {
            let remaining = tenure_months - month + 1;
            emi = compute_emi(closing, annual_rate_percent, remaining)?;
            debug!("build_schedule: month {month} prepayment {prepayment} re-amortised to emi={emi} over {remaining} months");
        }

        let principal_paid = scheduled_principal + prepayment;
        balance = closing;
        cumulative_interest += interest;
        cumulative_principal += principal_paid;

        schedule.push(EmiScheduleItem {
            month,
            emi: installment,
            principal: principal_paid,
            interest,
            prepayment,
            balance,
            cumulative_interest,
            cumulative_principal,
        });

        month += 1;
    }

    Ok(schedule)
}

fn prepayment_for_month(
    prepayments: &[PrepaymentScenario],
    month: Months,
) -> (Money, Option<PrepaymentType>) {
    prepayments
        .iter()
        .filter(|p| p.month == month && p.amount > Decimal::ZERO)
        .fold((Decimal::ZERO, None), |(sum, _), p| {
            (sum + round_currency(p.amount), Some(p.kind))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lump(month: Months, amount: Money, kind: PrepaymentType) -> PrepaymentScenario {
        PrepaymentScenario {
            month,
            amount,
            kind,
        }
    }

    #[test]
    fn test_schedule_closes_exactly() {
        let schedule = build_schedule(dec!(2_500_000), dec!(8.5), 240, &[]).unwrap();
        assert_eq!(schedule.len(), 240);
        assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);
        assert_eq!(schedule[0].month, 1);
        assert_eq!(schedule[0].interest, dec!(17708.33));
        assert_eq!(schedule[0].principal, dec!(3987.25));
    }

    #[test]
    fn test_component_identity_on_regular_rows() {
        let schedule = build_schedule(dec!(1_000_000), dec!(10), 120, &[]).unwrap();
        for row in &schedule[..schedule.len() - 1] {
            assert_eq!(row.principal + row.interest, row.emi, "month {}", row.month);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = build_schedule(dec!(1_200_000), Decimal::ZERO, 12, &[]).unwrap();
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|r| r.interest.is_zero()));
        assert!(schedule.iter().all(|r| r.emi == dec!(100_000)));
        assert_eq!(schedule[11].balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_uneven_split_settles_last_month() {
        let schedule = build_schedule(dec!(100), Decimal::ZERO, 3, &[]).unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].emi, dec!(33.33));
        assert_eq!(schedule[2].emi, dec!(33.34));
        assert_eq!(schedule[2].balance, Decimal::ZERO);
    }

    #[test]
    fn test_empty_for_non_positive_principal() {
        assert!(build_schedule(Decimal::ZERO, dec!(9), 12, &[]).unwrap().is_empty());
        assert!(build_schedule(dec!(-5), dec!(9), 12, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_zero_tenure_is_single_lump_row() {
        let schedule = build_schedule(dec!(10_000), dec!(9), 0, &[]).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].emi, dec!(10_000));
        assert_eq!(schedule[0].balance, Decimal::ZERO);
    }

    #[test]
    fn test_tenure_beyond_cap_rejected() {
        let err = build_schedule(dec!(1_000_000), dec!(8.5), 481, &[]).unwrap_err();
        assert!(matches!(err, crate::error::LoanFinanceError::InvalidTenure(481)));
    }

    #[test]
    fn test_reduce_emi_spreads_over_remaining_plus_one() {
        let schedule = build_schedule(
            dec!(2_500_000),
            dec!(8.5),
            240,
            &[lump(1, dec!(500_000), PrepaymentType::ReduceEmi)],
        )
        .unwrap();
        assert_eq!(schedule[0].balance, dec!(1_996_012.75));
        assert_eq!(schedule[1].emi, compute_emi(dec!(1_996_012.75), dec!(8.5), 240).unwrap());
        assert_eq!(schedule[1].emi, dec!(17321.86));
        assert_eq!(schedule.len(), 240);
        let last = schedule.last().unwrap();
        assert_eq!(last.balance, Decimal::ZERO);
        assert!(last.emi > schedule[1].emi);
    }

    #[test]
    fn test_prepayment_that_clears_loan_never_overpays() {
        let schedule = build_schedule(
            dec!(100_000),
            dec!(12),
            12,
            &[lump(3, dec!(1_000_000), PrepaymentType::ReduceTenure)],
        )
        .unwrap();
        assert_eq!(schedule.len(), 3);
        let last = &schedule[2];
        assert_eq!(last.balance, Decimal::ZERO);
        assert_eq!(last.cumulative_principal, dec!(100_000));
        assert!(last.prepayment < dec!(1_000_000));
    }

    #[test]
    fn test_same_month_prepayments_are_summed() {
        let split = build_schedule(
            dec!(500_000),
            dec!(9),
            60,
            &[
                lump(2, dec!(10_000), PrepaymentType::ReduceTenure),
                lump(2, dec!(15_000), PrepaymentType::ReduceTenure),
            ],
        )
        .unwrap();
        let single = build_schedule(
            dec!(500_000),
            dec!(9),
            60,
            &[lump(2, dec!(25_000), PrepaymentType::ReduceTenure)],
        )
        .unwrap();
        assert_eq!(split, single);
        assert_eq!(split[1].prepayment, dec!(25_000));
    }

    #[test]
    fn test_out_of_range_prepayment_ignored() {
        let base = build_schedule(dec!(200_000), dec!(11), 24, &[]).unwrap();
        let with_late = build_schedule(
            dec!(200_000),
            dec!(11),
            24,
            &[lump(99, dec!(5_000), PrepaymentType::ReduceEmi)],
        )
        .unwrap();
        assert_eq!(base, with_late);
    }

    #[test]
    fn test_schedule_totals() {
        let schedule = build_schedule(dec!(1_200_000), Decimal::ZERO, 12, &[]).unwrap();
        let totals = ScheduleTotals::from_schedule(&schedule);
        assert_eq!(totals.months, 12);
        assert_eq!(totals.total_emi, dec!(1_200_000));
        assert_eq!(totals.total_principal, dec!(1_200_000));
        assert_eq!(totals.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_prepayment_type_serde_names() {
        let json = serde_json::to_string(&PrepaymentType::ReduceEmi).unwrap();
        assert_eq!(json, "\"reduce-emi\"");
        let parsed: PrepaymentScenario =
            serde_json::from_str(r#"{"month":1,"amount":"5000","type":"reduce-tenure"}"#).unwrap();
        assert_eq!(parsed.kind, PrepaymentType::ReduceTenure);
    }
}
