use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthForecastDto {
    /// Month number (1-12)
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub fixed_expenses: Decimal,
    pub debt_payments: Decimal,
    pub variable_budget: Decimal,
    /// income - fixedExpenses - debtPayments - variableBudget
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForecastTotalsDto {
    pub income: Decimal,
    pub fixed_expenses: Decimal,
    pub debt_payments: Decimal,
    pub variable_budget: Decimal,
    pub net: Decimal,
}

/// Yearly budget forecast, one entry per calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForecastDto {
    pub user_id: String,
    pub year: i32,
    pub months: Vec<MonthForecastDto>,
    pub totals: ForecastTotalsDto,
}
