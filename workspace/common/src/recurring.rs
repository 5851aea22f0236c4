use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::patch::{deserialize_some, positive};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Income or fixed expense repeating from `startDate` until `endDate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionDto {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub kind: RecurringKind,
    /// Always positive, `kind` gives the direction
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub account_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "end_not_before_start"))]
pub struct CreateRecurringTransactionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub kind: RecurringKind,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub account_id: Option<i32>,
}

fn end_not_before_start(request: &CreateRecurringTransactionRequest) -> Result<(), ValidationError> {
    match request.end_date {
        Some(end) if end < request.start_date => Err(ValidationError::new("end_date_before_start_date")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecurringTransactionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub kind: Option<RecurringKind>,
    #[validate(custom(function = "positive"))]
    pub amount: Option<Decimal>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub account_id: Option<Option<i32>>,
}
