use chrono::{Datelike, NaiveDate};
use model::entities::debt_account;
use rust_decimal::Decimal;
use tracing::trace;

use crate::calendar::{months_between, payment_date_in_month};

/// The configured payment day as a calendar day, if it is a usable one.
fn payment_day(debt: &debt_account::Model) -> Option<u32> {
    u32::try_from(debt.payment_day)
        .ok()
        .filter(|day| (1..=31).contains(day))
}

/// Dates on which the minimum payment falls inside `[window_start, window_end]`.
///
/// Every month overlapping the window is checked, whatever the debt's
/// `created_at`: a forecast always projects the full window forward.
pub fn debt_payment_dates(
    debt: &debt_account::Model,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let Some(day) = payment_day(debt) else {
        trace!(
            "Debt id={} has unusable payment day {}, no payments projected",
            debt.id, debt.payment_day
        );
        return Vec::new();
    };
    if window_end < window_start {
        return Vec::new();
    }

    let mut dates = Vec::new();
    let mut year = window_start.year();
    let mut month = window_start.month();
    for _ in 0..=months_between(window_start, window_end) {
        if let Some(candidate) = payment_date_in_month(year, month, day) {
            if candidate >= window_start && candidate <= window_end {
                dates.push(candidate);
            }
        }
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    dates
}

/// Minimum payments attributed to the window.
pub fn debt_payment_in_window(
    debt: &debt_account::Model,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Decimal {
    let count = debt_payment_dates(debt, window_start, window_end).len();
    debt.minimum_payment * Decimal::from(count)
}

/// Projected minimum payments for each month of `year`, index 0 being January.
pub fn project_debt_payments(debts: &[debt_account::Model], year: i32) -> [Decimal; 12] {
    let mut months = [Decimal::ZERO; 12];
    let (Some(year_start), Some(year_end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return months;
    };

    for debt in debts {
        for date in debt_payment_dates(debt, year_start, year_end) {
            months[date.month0() as usize] += debt.minimum_payment;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use model::entities::debt_account::DebtType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn created(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn debt(payment_day: i32, minimum_payment: Decimal, created_at: NaiveDateTime) -> debt_account::Model {
        debt_account::Model {
            id: 1,
            user_id: "user-1".to_string(),
            name: "Visa".to_string(),
            debt_type: DebtType::CreditCard,
            balance: Decimal::new(250_000, 2),
            apr: Decimal::new(1999, 2),
            minimum_payment,
            payment_day,
            created_at,
        }
    }

    #[test]
    fn test_every_month_gets_one_payment() {
        let minimum = Decimal::new(7_550, 2);
        for day in [1, 15, 28, 29, 30, 31] {
            let debt = debt(day, minimum, created(2023, 1, 1));
            for year in [2023, 2024] {
                let months = project_debt_payments(std::slice::from_ref(&debt), year);
                assert!(months.iter().all(|m| *m == minimum), "day {} year {}", day, year);
                let total: Decimal = months.iter().copied().sum();
                assert_eq!(total, minimum * Decimal::from(12));
            }
        }
    }

    #[test]
    fn test_creation_date_does_not_suppress_earlier_months() {
        // Created in November of the forecast year: January..October still project a payment
        let minimum = Decimal::new(200, 0);
        let debt = debt(10, minimum, created(2024, 11, 20));

        let months = project_debt_payments(&[debt], 2024);

        assert_eq!(months[0], minimum);
        assert_eq!(months[9], minimum);
        assert_eq!(months.iter().copied().sum::<Decimal>(), Decimal::new(2_400, 0));
    }

    #[test]
    fn test_debt_created_after_forecast_year_still_projects() {
        let minimum = Decimal::new(50, 0);
        let debt = debt(5, minimum, created(2030, 6, 1));

        let months = project_debt_payments(&[debt], 2025);

        assert_eq!(months.iter().copied().sum::<Decimal>(), Decimal::new(600, 0));
    }

    #[test]
    fn test_day_31_in_30_day_month_pays_on_last_day() {
        let debt = debt(31, Decimal::ONE, created(2023, 1, 1));
        let dates = debt_payment_dates(&debt, date(2023, 4, 1), date(2023, 4, 30));
        assert_eq!(dates, vec![date(2023, 4, 30)]);
    }

    #[test]
    fn test_day_29_in_leap_and_common_february() {
        let debt = debt(29, Decimal::ONE, created(2020, 1, 1));

        let leap = debt_payment_dates(&debt, date(2024, 2, 1), date(2024, 2, 29));
        assert_eq!(leap, vec![date(2024, 2, 29)]);

        let common = debt_payment_dates(&debt, date(2023, 2, 1), date(2023, 2, 28));
        assert_eq!(common, vec![date(2023, 2, 28)]);
    }

    #[test]
    fn test_partial_window_only_counts_dates_inside() {
        let debt = debt(20, Decimal::new(10, 0), created(2023, 1, 1));

        assert_eq!(
            debt_payment_in_window(&debt, date(2023, 3, 1), date(2023, 3, 19)),
            Decimal::ZERO
        );
        assert_eq!(
            debt_payment_in_window(&debt, date(2023, 3, 20), date(2023, 5, 10)),
            Decimal::new(20, 0)
        );
    }

    #[test]
    fn test_unusable_payment_day_projects_nothing() {
        for day in [0, -3, 32] {
            let debt = debt(day, Decimal::new(10, 0), created(2023, 1, 1));
            let months = project_debt_payments(&[debt], 2023);
            assert!(months.iter().all(|m| m.is_zero()));
        }
    }

    #[test]
    fn test_multiple_debts_accumulate_per_month() {
        let mut first = debt(1, Decimal::new(100, 0), created(2023, 1, 1));
        first.id = 1;
        let mut second = debt(31, Decimal::new(35, 0), created(2023, 1, 1));
        second.id = 2;

        let months = project_debt_payments(&[first, second], 2023);

        assert!(months.iter().all(|m| *m == Decimal::new(135, 0)));
    }
}
