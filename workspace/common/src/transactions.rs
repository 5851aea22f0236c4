use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::patch::deserialize_some;

/// A single money movement. Negative amounts are outflows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: i32,
    pub user_id: String,
    pub account_id: Option<i32>,
    pub category_id: Option<i32>,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub account_id: Option<i32>,
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub account_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
}
