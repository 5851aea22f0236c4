use chrono::{Datelike, Duration, NaiveDate};
use model::entities::recurring_transaction::{self, Frequency, RecurringKind};
use rust_decimal::Decimal;

use crate::calendar::{add_months_clamped, months_between};

/// Step between two occurrences.
enum Step {
    Days(i64),
    Months(u32),
}

fn step_for(frequency: Frequency) -> Step {
    match frequency {
        Frequency::Weekly => Step::Days(7),
        Frequency::Biweekly => Step::Days(14),
        Frequency::Monthly => Step::Months(1),
        Frequency::Quarterly => Step::Months(3),
        Frequency::Yearly => Step::Months(12),
    }
}

/// The n-th occurrence counted from the anchor.
fn nth_occurrence(anchor: NaiveDate, step: &Step, n: u32) -> Option<NaiveDate> {
    match step {
        Step::Days(days) => anchor.checked_add_signed(Duration::days(days * n as i64)),
        Step::Months(months) => add_months_clamped(anchor, months * n),
    }
}

/// First index worth generating for a range starting at `range_start`.
fn first_index(anchor: NaiveDate, step: &Step, range_start: NaiveDate) -> u32 {
    if range_start <= anchor {
        return 0;
    }
    let skipped = match step {
        Step::Days(days) => (range_start - anchor).num_days() / days,
        // One step back so clamped month ends are never skipped
        Step::Months(months) => (months_between(anchor, range_start) / *months as i64 - 1).max(0),
    };
    u32::try_from(skipped).unwrap_or(0)
}

/// Generates occurrence dates for a recurring item within `[range_start, range_end]`.
///
/// Occurrences are computed from `start_date` (never from the previous
/// occurrence), so a series on the 31st comes back to the 31st after a short
/// month. Nothing is generated before `start_date` or after `end_date`.
pub fn recurring_occurrences(
    item: &recurring_transaction::Model,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut occurrences = Vec::new();

    // Check if the item ends before the range starts
    if let Some(end) = item.end_date {
        if end < range_start || end < item.start_date {
            return occurrences;
        }
    }
    if item.start_date > range_end {
        return occurrences;
    }

    let step = step_for(item.frequency);
    let mut n = first_index(item.start_date, &step, range_start);
    while let Some(date) = nth_occurrence(item.start_date, &step, n) {
        if date > range_end || item.end_date.is_some_and(|end| date > end) {
            break;
        }
        if date >= range_start {
            occurrences.push(date);
        }
        n += 1;
    }

    occurrences
}

/// Total amount of a recurring item over one calendar year.
pub fn annual_amount(item: &recurring_transaction::Model, year: i32) -> Decimal {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Decimal::ZERO;
    };
    item.amount * Decimal::from(recurring_occurrences(item, start, end).len())
}

/// Monthly income and fixed expense totals of a year, index 0 being January.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringProjection {
    pub income: [Decimal; 12],
    pub fixed_expenses: [Decimal; 12],
}

/// Projects every recurring item into the months of `year`.
pub fn project_recurring(items: &[recurring_transaction::Model], year: i32) -> RecurringProjection {
    let mut projection = RecurringProjection {
        income: [Decimal::ZERO; 12],
        fixed_expenses: [Decimal::ZERO; 12],
    };
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return projection;
    };

    for item in items {
        let bucket = match item.kind {
            RecurringKind::Income => &mut projection.income,
            RecurringKind::Expense => &mut projection.fixed_expenses,
        };
        for date in recurring_occurrences(item, start, end) {
            bucket[date.month0() as usize] += item.amount;
        }
    }
    projection
}
