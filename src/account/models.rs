use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Account type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Checking account for daily transactions
    Checking,
    /// Savings account
    Savings,
    /// Credit card account
    Credit,
    /// Brokerage or investment account
    Investment,
    /// Physical cash
    Cash,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Credit => "credit",
            AccountType::Investment => "investment",
            AccountType::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            "credit" => Some(AccountType::Credit),
            "investment" => Some(AccountType::Investment),
            "cash" => Some(AccountType::Cash),
            _ => None,
        }
    }
}

/// Validate a 3-letter ISO currency code
fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("invalid_currency_code"));
    }
    Ok(())
}

/// Database entity for accounts
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "account_type")]
    pub account_type: String,
    pub balance: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Account name
    #[schema(example = "My Checking")]
    pub name: String,
    /// Account type (checking, savings, credit, investment, cash)
    #[serde(rename = "type")]
    #[schema(example = "checking")]
    pub account_type: String,
    /// Current balance, maintained by transaction writes
    #[schema(example = 1500.00)]
    pub balance: Decimal,
    /// ISO currency code
    #[schema(example = "USD")]
    pub currency: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Optional free-form description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
            balance: account.balance,
            currency: account.currency,
            is_active: account.is_active,
            description: account.description,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Delete operation response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Success message
    #[schema(example = "Account deleted successfully")]
    pub message: String,
    /// Deleted resource ID
    pub id: Uuid,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

/// Request body for creating an account
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountDto {
    /// Account name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "My Checking")]
    pub name: String,

    /// Account type
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Initial balance (defaults to 0)
    #[serde(default)]
    #[schema(example = 1000.00)]
    pub balance: Option<Decimal>,

    /// ISO currency code (defaults to USD)
    #[validate(custom(
        function = "validate_currency_code",
        message = "Currency must be a 3-letter code"
    ))]
    #[serde(default = "default_currency")]
    #[schema(example = "USD")]
    pub currency: String,

    /// Whether the account is active (defaults to true)
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Optional free-form description
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// Request body for replacing an account (PUT).
///
/// Balance is deliberately absent: the stored balance is a running total
/// owned by transaction writes.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountDto {
    /// Account name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "My Savings")]
    pub name: String,

    /// Account type
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// ISO currency code
    #[validate(custom(
        function = "validate_currency_code",
        message = "Currency must be a 3-letter code"
    ))]
    #[serde(default = "default_currency")]
    #[schema(example = "USD")]
    pub currency: String,

    /// Whether the account is active
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Optional free-form description
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// Path parameters for account ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct AccountIdPath {
    /// Account UUID
    pub id: Uuid,
}
