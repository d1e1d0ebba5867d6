use sqlx::PgPool;
use uuid::Uuid;

use super::models::{RecurringTransaction, RecurringTransactionDto};
use crate::errors::AppError;

/// Service layer for recurring transaction templates.
pub struct RecurringService;

impl RecurringService {
    /// List all recurring templates, newest first.
    pub async fn list_recurring(pool: &PgPool) -> Result<Vec<RecurringTransaction>, AppError> {
        sqlx::query_as::<_, RecurringTransaction>(
            r#"
            SELECT id, amount, description, category_id, account_id, transaction_type,
                   frequency, start_date, end_date, last_processed, created_at, updated_at
            FROM recurring_transactions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Get a recurring template by ID.
    pub async fn get_by_id(
        pool: &PgPool,
        recurring_id: Uuid,
    ) -> Result<RecurringTransaction, AppError> {
        sqlx::query_as::<_, RecurringTransaction>(
            r#"
            SELECT id, amount, description, category_id, account_id, transaction_type,
                   frequency, start_date, end_date, last_processed, created_at, updated_at
            FROM recurring_transactions
            WHERE id = $1
            "#,
        )
        .bind(recurring_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Recurring transaction not found".to_string()))
    }

    /// Create a new recurring template.
    pub async fn create(
        pool: &PgPool,
        dto: &RecurringTransactionDto,
    ) -> Result<RecurringTransaction, AppError> {
        Self::verify_references(pool, dto).await?;

        sqlx::query_as::<_, RecurringTransaction>(
            r#"
            INSERT INTO recurring_transactions
                (amount, description, category_id, account_id, transaction_type,
                 frequency, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, amount, description, category_id, account_id, transaction_type,
                      frequency, start_date, end_date, last_processed, created_at, updated_at
            "#,
        )
        .bind(dto.amount)
        .bind(&dto.description)
        .bind(dto.category_id)
        .bind(dto.account_id)
        .bind(dto.transaction_type.as_str())
        .bind(dto.frequency.as_str())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Replace a recurring template (PUT semantics). `last_processed` is
    /// preserved; it belongs to whatever materializes the templates.
    pub async fn update(
        pool: &PgPool,
        recurring_id: Uuid,
        dto: &RecurringTransactionDto,
    ) -> Result<RecurringTransaction, AppError> {
        Self::verify_references(pool, dto).await?;

        sqlx::query_as::<_, RecurringTransaction>(
            r#"
            UPDATE recurring_transactions SET
                amount = $2,
                description = $3,
                category_id = $4,
                account_id = $5,
                transaction_type = $6,
                frequency = $7,
                start_date = $8,
                end_date = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, amount, description, category_id, account_id, transaction_type,
                      frequency, start_date, end_date, last_processed, created_at, updated_at
            "#,
        )
        .bind(recurring_id)
        .bind(dto.amount)
        .bind(&dto.description)
        .bind(dto.category_id)
        .bind(dto.account_id)
        .bind(dto.transaction_type.as_str())
        .bind(dto.frequency.as_str())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Recurring transaction not found".to_string()))
    }

    /// Delete a recurring template.
    pub async fn delete(pool: &PgPool, recurring_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM recurring_transactions WHERE id = $1")
            .bind(recurring_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Recurring transaction not found".to_string(),
            ));
        }

        Ok(())
    }

    /// Templates must reference an existing account and category.
    async fn verify_references(
        pool: &PgPool,
        dto: &RecurringTransactionDto,
    ) -> Result<(), AppError> {
        let account_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                .bind(dto.account_id)
                .fetch_one(pool)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !account_exists {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        let category_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(dto.category_id)
                .fetch_one(pool)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !category_exists {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        Ok(())
    }
}
