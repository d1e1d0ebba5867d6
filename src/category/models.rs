use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Category type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income-only category
    Income,
    /// Expense-only category
    Expense,
    /// Usable for both income and expense transactions
    Both,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::Both => "both",
        }
    }
}

/// Validate hex color format (#RRGGBB)
fn validate_color_hex(color: &str) -> Result<(), ValidationError> {
    if color.len() != 7 {
        return Err(ValidationError::new("invalid_length"));
    }
    if !color.starts_with('#') {
        return Err(ValidationError::new("missing_hash"));
    }
    if !color[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("invalid_hex_chars"));
    }
    Ok(())
}

/// Validate that a Decimal is non-negative
fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("must_be_non_negative"));
    }
    Ok(())
}

/// Database entity for categories
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "category_type")]
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_category_id: Option<Uuid>,
    pub budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Unique category identifier
    pub id: Uuid,
    /// Category name
    #[schema(example = "Groceries")]
    pub name: String,
    /// Category type (income, expense, both)
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub category_type: String,
    /// Display color in hex format
    #[schema(example = "#FF5722")]
    pub color: Option<String>,
    /// Display icon name
    #[schema(example = "shopping-cart")]
    pub icon: Option<String>,
    /// Optional parent category for hierarchies
    pub parent_category_id: Option<Uuid>,
    /// Optional monthly budget for this category
    #[schema(example = 500.00)]
    pub budget: Option<Decimal>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(cat: Category) -> Self {
        Self {
            id: cat.id,
            name: cat.name,
            category_type: cat.category_type,
            color: cat.color,
            icon: cat.icon,
            parent_category_id: cat.parent_category_id,
            budget: cat.budget,
            created_at: cat.created_at,
            updated_at: cat.updated_at,
        }
    }
}

/// Request body for creating or replacing a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    /// Category name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Groceries")]
    pub name: String,

    /// Category type
    #[serde(rename = "type")]
    pub category_type: CategoryType,

    /// Display color in hex format (#RRGGBB)
    #[schema(example = "#FF5722")]
    pub color: Option<String>,

    /// Display icon name
    #[schema(example = "shopping-cart")]
    pub icon: Option<String>,

    /// Optional parent category for hierarchies
    pub parent_category_id: Option<Uuid>,

    /// Optional monthly budget for this category
    #[schema(example = 500.00)]
    pub budget: Option<Decimal>,
}

impl CategoryDto {
    /// Validate the optional color and budget fields
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if let Some(color) = &self.color {
            validate_color_hex(color)?;
        }
        if let Some(budget) = &self.budget {
            validate_non_negative(budget)?;
        }
        Ok(())
    }
}

/// Path parameters for category ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryIdPath {
    /// Category UUID
    pub id: Uuid,
}
