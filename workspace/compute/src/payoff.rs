//! Month by month debt payoff simulation for the snowball and avalanche strategies.

use chrono::{Datelike, NaiveDate};
use model::entities::debt_account;
use model::entities::user_preference::PayoffStrategy;
use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::calendar::{add_months_clamped, month_bounds};
use crate::error::{ComputeError, Result};

/// Simulation horizon.
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// Outcome for a single debt.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtPayoff {
    pub debt_id: i32,
    pub name: String,
    /// 1-based month of the simulation in which the balance reaches zero,
    /// 0 for debts that start without a balance.
    pub payoff_month: u32,
    /// Last day of the payoff month.
    pub payoff_date: NaiveDate,
    pub interest_paid: Decimal,
    pub total_paid: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoffPlan {
    pub strategy: PayoffStrategy,
    pub extra_payment: Decimal,
    pub months_to_debt_free: u32,
    /// `None` when there is nothing to pay off.
    pub debt_free_date: Option<NaiveDate>,
    pub total_interest: Decimal,
    pub total_paid: Decimal,
    /// Debts in the order the strategy attacks them.
    pub debts: Vec<DebtPayoff>,
}

/// Sorts debts in the order extra money goes to them.
///
/// Snowball takes the smallest balance first, breaking ties by higher APR.
/// Avalanche takes the highest APR first, breaking ties by smaller balance.
/// Remaining ties fall back to the id so the order is stable.
pub fn order_debts(debts: &[debt_account::Model], strategy: PayoffStrategy) -> Vec<debt_account::Model> {
    let mut ordered = debts.to_vec();
    match strategy {
        PayoffStrategy::Snowball => ordered.sort_by(|a, b| {
            a.balance
                .cmp(&b.balance)
                .then_with(|| b.apr.cmp(&a.apr))
                .then_with(|| a.id.cmp(&b.id))
        }),
        PayoffStrategy::Avalanche => ordered.sort_by(|a, b| {
            b.apr
                .cmp(&a.apr)
                .then_with(|| a.balance.cmp(&b.balance))
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
    ordered
}

struct Tracker {
    debt: debt_account::Model,
    balance: Decimal,
    interest_paid: Decimal,
    total_paid: Decimal,
    payoff_month: Option<u32>,
}

impl Tracker {
    fn pay(&mut self, available: Decimal) -> Result<Decimal> {
        let payment = available.min(self.balance);
        self.balance -= payment;
        self.total_paid = self.total_paid.checked_add(payment).ok_or_else(out_of_range)?;
        Ok(payment)
    }

    /// Adds one month of interest to the balance.
    fn accrue(&mut self) -> Result<()> {
        let interest = self
            .balance
            .checked_mul(self.debt.apr)
            .and_then(|v| v.checked_div(Decimal::from(1200)))
            .ok_or_else(out_of_range)?
            .round_dp(2);
        self.balance = self.balance.checked_add(interest).ok_or_else(out_of_range)?;
        self.interest_paid = self.interest_paid.checked_add(interest).ok_or_else(out_of_range)?;
        Ok(())
    }
}

/// A balance that outgrows `Decimal` is never paid off.
fn out_of_range() -> ComputeError {
    warn!("Debt balances left the representable range");
    ComputeError::PayoffNotReached {
        months: MAX_PAYOFF_MONTHS,
    }
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

fn validate(debts: &[debt_account::Model], extra_payment: Decimal) -> Result<()> {
    if extra_payment < Decimal::ZERO {
        return Err(ComputeError::InvalidInput(
            "extra payment must not be negative".to_string(),
        ));
    }
    for debt in debts {
        if debt.balance < Decimal::ZERO || debt.apr < Decimal::ZERO || debt.minimum_payment < Decimal::ZERO {
            return Err(ComputeError::InvalidInput(format!(
                "debt {} has a negative balance, APR or minimum payment",
                debt.id
            )));
        }
    }
    Ok(())
}

fn month_end(start_month: NaiveDate, offset: u32) -> Result<NaiveDate> {
    let month = add_months_clamped(start_month, offset)
        .ok_or_else(|| ComputeError::Date(format!("{} plus {} months", start_month, offset)))?;
    let (_, end) = month_bounds(month.year(), month.month())?;
    Ok(end)
}

/// Simulates paying the debts down month by month.
///
/// Each month every open balance first accrues `balance * apr / 100 / 12`
/// rounded to cents. Every open debt then receives its minimum payment. The
/// rest of the monthly budget (all minimums plus `extra_payment`) goes to the
/// first open debt in strategy order and any remainder cascades to the next
/// one, so minimums of paid off debts roll over.
///
/// `start_month` is the first simulated month (any day inside it).
pub fn simulate_payoff(
    debts: &[debt_account::Model],
    strategy: PayoffStrategy,
    extra_payment: Decimal,
    start_month: NaiveDate,
) -> Result<PayoffPlan> {
    validate(debts, extra_payment)?;

    let monthly_budget = checked_sum(debts.iter().map(|d| d.minimum_payment).chain([extra_payment]))
        .ok_or_else(|| ComputeError::InvalidInput("monthly payments are too large".to_string()))?;
    debug!(
        "Simulating {:?} payoff of {} debts with monthly budget {}",
        strategy,
        debts.len(),
        monthly_budget
    );

    let mut trackers: Vec<Tracker> = order_debts(debts, strategy)
        .into_iter()
        .map(|debt| Tracker {
            balance: debt.balance,
            payoff_month: debt.balance.is_zero().then_some(0),
            interest_paid: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            debt,
        })
        .collect();

    let mut month = 0u32;
    while trackers.iter().any(|t| t.payoff_month.is_none()) {
        if month == MAX_PAYOFF_MONTHS {
            warn!(
                "Debts not paid off after {} months with monthly budget {}",
                MAX_PAYOFF_MONTHS, monthly_budget
            );
            return Err(ComputeError::PayoffNotReached {
                months: MAX_PAYOFF_MONTHS,
            });
        }
        month += 1;

        for tracker in trackers.iter_mut().filter(|t| t.payoff_month.is_none()) {
            tracker.accrue()?;
        }

        let mut available = monthly_budget;
        for tracker in trackers.iter_mut().filter(|t| t.payoff_month.is_none()) {
            let minimum = tracker.debt.minimum_payment.min(available);
            available -= tracker.pay(minimum)?;
        }
        for tracker in trackers.iter_mut().filter(|t| t.payoff_month.is_none()) {
            if available <= Decimal::ZERO {
                break;
            }
            available -= tracker.pay(available)?;
        }

        for tracker in trackers.iter_mut().filter(|t| t.payoff_month.is_none()) {
            if tracker.balance.is_zero() {
                trace!("Debt id={} paid off in month {}", tracker.debt.id, month);
                tracker.payoff_month = Some(month);
            }
        }
    }

    let mut result = Vec::with_capacity(trackers.len());
    for tracker in trackers {
        let payoff_month = tracker.payoff_month.unwrap_or(month);
        result.push(DebtPayoff {
            debt_id: tracker.debt.id,
            name: tracker.debt.name,
            payoff_month,
            payoff_date: month_end(start_month, payoff_month.saturating_sub(1))?,
            interest_paid: tracker.interest_paid,
            total_paid: tracker.total_paid,
        });
    }

    let debt_free_date = if month == 0 {
        None
    } else {
        Some(month_end(start_month, month - 1)?)
    };

    let total_interest = checked_sum(result.iter().map(|d| d.interest_paid)).ok_or_else(out_of_range)?;
    let total_paid = checked_sum(result.iter().map(|d| d.total_paid)).ok_or_else(out_of_range)?;

    Ok(PayoffPlan {
        strategy,
        extra_payment,
        months_to_debt_free: month,
        debt_free_date,
        total_interest,
        total_paid,
        debts: result,
    })
}
