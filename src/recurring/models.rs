use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::transaction::models::TransactionType;

/// Recurrence frequency enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Validate that amount is positive
fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}

/// Database entity for recurring transaction templates.
///
/// Templates are plain data; nothing in this service generates transactions
/// from them on a schedule.
#[derive(Debug, Clone, FromRow)]
pub struct RecurringTransaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub category_id: Uuid,
    pub account_id: Uuid,
    #[sqlx(rename = "transaction_type")]
    pub transaction_type: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub last_processed: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recurring template information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionResponse {
    /// Unique template identifier
    pub id: Uuid,
    /// Amount of each generated transaction
    #[schema(example = 1200.00)]
    pub amount: Decimal,
    /// Description
    #[schema(example = "Monthly rent")]
    pub description: String,
    /// Category for generated transactions
    pub category_id: Uuid,
    /// Account for generated transactions
    pub account_id: Uuid,
    /// Transaction type (income, expense, transfer)
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    /// Recurrence frequency (daily, weekly, monthly, yearly)
    #[schema(example = "monthly")]
    pub frequency: String,
    /// First date the template applies
    pub start_date: NaiveDate,
    /// Optional last date the template applies
    pub end_date: Option<NaiveDate>,
    /// Date the template was last materialized, if ever
    pub last_processed: Option<NaiveDate>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<RecurringTransaction> for RecurringTransactionResponse {
    fn from(r: RecurringTransaction) -> Self {
        Self {
            id: r.id,
            amount: r.amount,
            description: r.description,
            category_id: r.category_id,
            account_id: r.account_id,
            transaction_type: r.transaction_type,
            frequency: r.frequency,
            start_date: r.start_date,
            end_date: r.end_date,
            last_processed: r.last_processed,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Request body for creating or replacing a recurring template
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionDto {
    /// Amount of each generated transaction (must be positive)
    #[validate(custom(
        function = "validate_positive_amount",
        message = "Amount must be positive"
    ))]
    #[schema(example = 1200.00)]
    pub amount: Decimal,

    /// Description (max 200 chars)
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    #[schema(example = "Monthly rent")]
    pub description: String,

    /// Category for generated transactions
    pub category_id: Uuid,

    /// Account for generated transactions
    pub account_id: Uuid,

    /// Transaction type
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Recurrence frequency
    pub frequency: Frequency,

    /// First date the template applies
    pub start_date: NaiveDate,

    /// Optional last date the template applies
    pub end_date: Option<NaiveDate>,
}

impl RecurringTransactionDto {
    /// The end date, when present, must not precede the start date
    pub fn validate_date_order(&self) -> Result<(), ValidationError> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError::new("end_date_before_start_date"));
            }
        }
        Ok(())
    }
}

/// Path parameters for recurring template ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecurringIdPath {
    /// Recurring template UUID
    pub id: Uuid,
}
