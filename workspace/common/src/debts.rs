use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::patch::{non_negative, percentage};
use crate::users::DebtStrategy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DebtType {
    CreditCard,
    StudentLoan,
    PersonalLoan,
    Mortgage,
    AutoLoan,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebtAccountDto {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    pub balance: Decimal,
    /// Annual percentage rate in percent
    pub apr: Decimal,
    pub minimum_payment: Decimal,
    /// Day of month the payment is due (1-31)
    pub payment_day: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtAccountRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    #[validate(custom(function = "non_negative"))]
    pub balance: Decimal,
    #[validate(custom(function = "percentage"))]
    pub apr: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub minimum_payment: Decimal,
    #[validate(range(min = 1, max = 31))]
    pub payment_day: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebtAccountRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub debt_type: Option<DebtType>,
    #[validate(custom(function = "non_negative"))]
    pub balance: Option<Decimal>,
    #[validate(custom(function = "percentage"))]
    pub apr: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub minimum_payment: Option<Decimal>,
    #[validate(range(min = 1, max = 31))]
    pub payment_day: Option<i32>,
}

/// Payoff outcome of one debt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoffDto {
    pub debt_id: i32,
    pub name: String,
    pub payoff_month: u32,
    pub payoff_date: NaiveDate,
    pub interest_paid: Decimal,
    pub total_paid: Decimal,
}

/// Payoff plan of all debts of a user, debts in the order they are attacked.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebtPlanDto {
    pub user_id: String,
    pub strategy: DebtStrategy,
    pub extra_payment: Decimal,
    pub total_balance: Decimal,
    pub total_minimum_payment: Decimal,
    pub months_to_debt_free: u32,
    pub debt_free_date: Option<NaiveDate>,
    pub total_interest: Decimal,
    pub total_paid: Decimal,
    pub debts: Vec<DebtPayoffDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_type_wire_names() {
        assert_eq!(serde_json::to_string(&DebtType::StudentLoan).unwrap(), r#""student-loan""#);
        let parsed: DebtType = serde_json::from_str(r#""auto-loan""#).unwrap();
        assert_eq!(parsed, DebtType::AutoLoan);
    }

    #[test]
    fn test_payment_day_range() {
        let mut request = CreateDebtAccountRequest {
            name: "Visa".to_string(),
            debt_type: DebtType::CreditCard,
            balance: Decimal::new(1_000, 0),
            apr: Decimal::new(1999, 2),
            minimum_payment: Decimal::new(25, 0),
            payment_day: 31,
        };
        assert!(request.validate().is_ok());

        request.payment_day = 0;
        assert!(request.validate().is_err());
        request.payment_day = 32;
        assert!(request.validate().is_err());
    }
}
