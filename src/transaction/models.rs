use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Transaction type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money spent (decreases account balance)
    #[default]
    Expense,
    /// Money received (increases account balance)
    Income,
    /// Transfer between accounts (no balance change)
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "expense" => Some(TransactionType::Expense),
            "income" => Some(TransactionType::Income),
            "transfer" => Some(TransactionType::Transfer),
            _ => None,
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

/// Database model for transactions
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: String,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub recurring_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn get_type(&self) -> TransactionType {
        TransactionType::parse(&self.transaction_type).unwrap_or_default()
    }
}

/// Transaction row joined with its category (LEFT JOIN, so the category
/// columns are absent when the category has been deleted)
#[derive(Debug, Clone, FromRow)]
pub struct TransactionWithCategory {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: String,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub recurring_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub category_type: Option<String>,
    pub category_color: Option<String>,
    pub category_icon: Option<String>,
}

/// Condensed category info embedded in transaction reads
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedCategoryInfo {
    pub id: Uuid,
    #[schema(example = "Groceries")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Unique transaction identifier
    pub id: Uuid,
    /// Transaction amount (always a positive magnitude)
    #[schema(example = 50.00)]
    pub amount: Decimal,
    /// Description
    #[schema(example = "Weekly groceries")]
    pub description: String,
    /// Date of the transaction
    pub date: NaiveDate,
    /// Category this transaction belongs to
    pub category_id: Uuid,
    /// Account the transaction is booked against
    pub account_id: Uuid,
    /// Transaction type (income, expense, transfer)
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    /// Optional tags
    pub tags: Option<Vec<String>>,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Link to the recurring template that produced this transaction
    pub recurring_id: Option<Uuid>,
    /// Embedded category (populated on reads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EmbeddedCategoryInfo>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            amount: t.amount,
            description: t.description,
            date: t.date,
            category_id: t.category_id,
            account_id: t.account_id,
            transaction_type: t.transaction_type,
            tags: t.tags,
            notes: t.notes,
            recurring_id: t.recurring_id,
            category: None,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<TransactionWithCategory> for TransactionResponse {
    fn from(row: TransactionWithCategory) -> Self {
        let category = row.category_name.map(|name| EmbeddedCategoryInfo {
            id: row.category_id,
            name,
            category_type: row.category_type.unwrap_or_default(),
            color: row.category_color,
            icon: row.category_icon,
        });

        Self {
            id: row.id,
            amount: row.amount,
            description: row.description,
            date: row.date,
            category_id: row.category_id,
            account_id: row.account_id,
            transaction_type: row.transaction_type,
            tags: row.tags,
            notes: row.notes,
            recurring_id: row.recurring_id,
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating or replacing a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Transaction amount (must be positive)
    #[validate(custom(
        function = "validate_positive_amount",
        message = "Amount must be positive"
    ))]
    #[schema(example = 50.00)]
    pub amount: Decimal,

    /// Description (max 200 chars)
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: String,

    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,

    /// Category this transaction belongs to
    pub category_id: Uuid,

    /// Transaction type
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Account the transaction is booked against
    pub account_id: Uuid,

    /// Optional tags
    pub tags: Option<Vec<String>>,

    /// Optional free-form notes (max 500 chars)
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// Link to a recurring template
    pub recurring_id: Option<Uuid>,
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    /// Page number (1-based)
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,

    /// Results per page (1-100)
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    #[param(example = 20)]
    pub limit: i64,

    /// Filter by start date (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by end date (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Filter by type (income, expense, transfer)
    #[serde(rename = "type")]
    #[param(example = "expense")]
    pub transaction_type: Option<TransactionType>,
    /// Filter by category
    pub category_id: Option<Uuid>,
    /// Filter by account
    pub account_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTransactionResponse {
    /// List of transactions
    pub data: Vec<TransactionResponse>,
    /// Total count matching filters
    #[schema(example = 100)]
    pub total: i64,
    /// Page used
    #[schema(example = 1)]
    pub page: i64,
    /// Limit used
    #[schema(example = 20)]
    pub limit: i64,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

/// Path parameters for the monthly report
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportPath {
    /// Calendar year
    #[param(example = 2025)]
    pub year: i32,
    /// Calendar month (1-12)
    #[param(example = 6)]
    pub month: u32,
}

/// Query parameters for the flow diagram
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FlowQuery {
    /// Start of the window (defaults to January 1st of the current year)
    pub start_date: Option<NaiveDate>,
    /// End of the window (defaults to today)
    pub end_date: Option<NaiveDate>,
}

/// Per-category sum in the monthly report
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category name
    #[schema(example = "Groceries")]
    pub category: String,
    /// Summed amount for the month
    #[schema(example = 350.00)]
    pub total: Decimal,
}

/// Row shape for the per-category report query
#[derive(Debug, FromRow)]
pub struct CategoryTotalRow {
    pub category: String,
    pub total: Option<Decimal>,
}

/// Row shape for the income/expense totals query
#[derive(Debug, FromRow)]
pub struct ReportTotalsRow {
    pub income: Option<Decimal>,
    pub expenses: Option<Decimal>,
}

/// Monthly report: income and expense sums plus a category breakdown
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    /// Sum of income transaction amounts in the month
    #[schema(example = 4200.00)]
    pub income: Decimal,
    /// Sum of expense transaction amounts in the month
    #[schema(example = 1850.00)]
    pub expenses: Decimal,
    /// Per-category sums (all transaction types)
    pub by_category: Vec<CategoryTotal>,
}

/// Node in the flow diagram (a category or an account)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    /// Entity ID
    pub id: Uuid,
    /// Display name
    #[schema(example = "Groceries")]
    pub name: String,
    /// Node kind (category or account)
    #[serde(rename = "type")]
    #[schema(example = "category")]
    pub node_type: String,
}

/// Row shape for the flow node queries
#[derive(Debug, FromRow)]
pub struct FlowNodeRow {
    pub id: Uuid,
    pub name: String,
}

/// Aggregated money flow from a category to an account
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowLink {
    /// Source category ID
    pub source: Uuid,
    /// Target account ID
    pub target: Uuid,
    /// Summed amount over the window
    #[schema(example = 420.00)]
    pub value: Decimal,
    /// Transaction type of the grouped flows
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
}

/// Node/edge structure for the Sankey diagram
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowData {
    /// All categories and accounts
    pub nodes: Vec<FlowNode>,
    /// Summed flows between them
    pub links: Vec<FlowLink>,
}
