pub mod calendar;
pub mod error;
pub mod forecast;
pub mod payoff;

pub use error::{ComputeError, Result};
pub use forecast::{forecast_year, BudgetForecast, ForecastTotals, MonthForecast};
pub use payoff::{order_debts, simulate_payoff, DebtPayoff, PayoffPlan, MAX_PAYOFF_MONTHS};
