pub mod debt;
pub mod recurring;

use chrono::NaiveDate;
use model::entities::{budget_category, debt_account, recurring_transaction};
use rust_decimal::Decimal;
use tracing::debug;

use crate::calendar::month_bounds;
use crate::error::Result;

pub use debt::{debt_payment_dates, debt_payment_in_window, project_debt_payments};
pub use recurring::{annual_amount, project_recurring, recurring_occurrences, RecurringProjection};

/// Projected cash flow of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthForecast {
    /// 1..=12
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub fixed_expenses: Decimal,
    pub debt_payments: Decimal,
    pub variable_budget: Decimal,
    pub net: Decimal,
}

/// Sums of every month of a forecast.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastTotals {
    pub income: Decimal,
    pub fixed_expenses: Decimal,
    pub debt_payments: Decimal,
    pub variable_budget: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetForecast {
    pub year: i32,
    pub months: Vec<MonthForecast>,
    pub totals: ForecastTotals,
}

/// Builds the twelve month forecast of `year`.
///
/// Income and fixed expenses come from recurring items, debt payments from
/// each debt's minimum on its payment day and the variable budget is the
/// monthly sum of all budget categories.
pub fn forecast_year(
    year: i32,
    recurring: &[recurring_transaction::Model],
    debts: &[debt_account::Model],
    budget_categories: &[budget_category::Model],
) -> Result<BudgetForecast> {
    debug!(
        "Forecasting year {} from {} recurring items, {} debts and {} budget categories",
        year,
        recurring.len(),
        debts.len(),
        budget_categories.len()
    );

    let projection = project_recurring(recurring, year);
    let debt_payments = project_debt_payments(debts, year);
    let variable_budget: Decimal = budget_categories.iter().map(|b| b.budgeted_amount).sum();

    let mut months = Vec::with_capacity(12);
    let mut totals = ForecastTotals::default();
    for month in 1..=12u32 {
        let (start, end) = month_bounds(year, month)?;
        let index = (month - 1) as usize;
        let income = projection.income[index];
        let fixed_expenses = projection.fixed_expenses[index];
        let debt = debt_payments[index];
        let net = income - fixed_expenses - debt - variable_budget;

        totals.income += income;
        totals.fixed_expenses += fixed_expenses;
        totals.debt_payments += debt;
        totals.variable_budget += variable_budget;
        totals.net += net;

        months.push(MonthForecast {
            month,
            start,
            end,
            income,
            fixed_expenses,
            debt_payments: debt,
            variable_budget,
            net,
        });
    }

    Ok(BudgetForecast {
        year,
        months,
        totals,
    })
}
