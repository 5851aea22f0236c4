use common::{
    BudgetForecastDto, DebtPayoffDto, DebtPlanDto, ForecastTotalsDto, MonthForecastDto,
};
use compute::{BudgetForecast, PayoffPlan};
use model::entities::debt_account;
use rust_decimal::Decimal;

use crate::store::mapper::strategy_from_row;

/// Converts a computed forecast into its API shape.
pub fn forecast_to_dto(user_id: &str, forecast: BudgetForecast) -> BudgetForecastDto {
    let months = forecast
        .months
        .into_iter()
        .map(|month| MonthForecastDto {
            month: month.month,
            start: month.start,
            end: month.end,
            income: month.income,
            fixed_expenses: month.fixed_expenses,
            debt_payments: month.debt_payments,
            variable_budget: month.variable_budget,
            net: month.net,
        })
        .collect();

    BudgetForecastDto {
        user_id: user_id.to_string(),
        year: forecast.year,
        months,
        totals: ForecastTotalsDto {
            income: forecast.totals.income,
            fixed_expenses: forecast.totals.fixed_expenses,
            debt_payments: forecast.totals.debt_payments,
            variable_budget: forecast.totals.variable_budget,
            net: forecast.totals.net,
        },
    }
}

/// Converts a payoff simulation into its API shape. `debts` are the rows
/// the plan was simulated from.
pub fn plan_to_dto(user_id: &str, debts: &[debt_account::Model], plan: PayoffPlan) -> DebtPlanDto {
    let total_balance: Decimal = debts.iter().map(|d| d.balance).sum();
    let total_minimum_payment: Decimal = debts.iter().map(|d| d.minimum_payment).sum();

    DebtPlanDto {
        user_id: user_id.to_string(),
        strategy: strategy_from_row(plan.strategy),
        extra_payment: plan.extra_payment,
        total_balance,
        total_minimum_payment,
        months_to_debt_free: plan.months_to_debt_free,
        debt_free_date: plan.debt_free_date,
        total_interest: plan.total_interest,
        total_paid: plan.total_paid,
        debts: plan
            .debts
            .into_iter()
            .map(|debt| DebtPayoffDto {
                debt_id: debt.debt_id,
                name: debt.name,
                payoff_month: debt.payoff_month,
                payoff_date: debt.payoff_date,
                interest_paid: debt.interest_paid,
                total_paid: debt.total_paid,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::DebtStrategy;
    use compute::{forecast_year, simulate_payoff};
    use model::entities::debt_account::DebtType;
    use model::entities::user_preference::PayoffStrategy;

    fn debt(id: i32, balance: i64, minimum: i64) -> debt_account::Model {
        debt_account::Model {
            id,
            user_id: "u-1".to_string(),
            name: format!("Debt {}", id),
            debt_type: DebtType::PersonalLoan,
            balance: Decimal::new(balance, 0),
            apr: Decimal::ZERO,
            minimum_payment: Decimal::new(minimum, 0),
            payment_day: 15,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_plan_to_dto_sums_inputs() {
        let debts = vec![debt(1, 300, 100), debt(2, 500, 100)];
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let plan = simulate_payoff(&debts, PayoffStrategy::Snowball, Decimal::ZERO, start).unwrap();

        let dto = plan_to_dto("u-1", &debts, plan);
        assert_eq!(dto.strategy, DebtStrategy::Snowball);
        assert_eq!(dto.total_balance, Decimal::new(800, 0));
        assert_eq!(dto.total_minimum_payment, Decimal::new(200, 0));
        assert_eq!(dto.debts.len(), 2);
        assert_eq!(dto.debts[0].debt_id, 1);
        assert_eq!(dto.total_paid, Decimal::new(800, 0));
    }

    #[test]
    fn test_forecast_to_dto_keeps_every_month() {
        let forecast = forecast_year(2024, &[], &[debt(1, 300, 100)], &[]).unwrap();
        let dto = forecast_to_dto("u-1", forecast);

        assert_eq!(dto.user_id, "u-1");
        assert_eq!(dto.months.len(), 12);
        assert_eq!(dto.totals.debt_payments, Decimal::new(1_200, 0));
        assert_eq!(dto.months[1].end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
