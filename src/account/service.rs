use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Account, CreateAccountDto, UpdateAccountDto};
use crate::errors::AppError;

/// Service layer for account business logic.
pub struct AccountService;

impl AccountService {
    /// List all accounts, sorted by name.
    pub async fn list_accounts(pool: &PgPool) -> Result<Vec<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, account_type, balance, currency, is_active, description,
                   created_at, updated_at
            FROM accounts
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Get an account by ID.
    pub async fn get_account_by_id(pool: &PgPool, account_id: Uuid) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, account_type, balance, currency, is_active, description,
                   created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Create a new account.
    pub async fn create_account(pool: &PgPool, dto: &CreateAccountDto) -> Result<Account, AppError> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }

        let balance = dto.balance.unwrap_or(Decimal::ZERO);

        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, account_type, balance, currency, is_active, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, account_type, balance, currency, is_active, description,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(dto.account_type.as_str())
        .bind(balance)
        .bind(dto.currency.to_uppercase())
        .bind(dto.is_active)
        .bind(&dto.description)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Replace an account's descriptive fields (PUT semantics).
    /// The stored balance is never written here; it belongs to transaction writes.
    pub async fn update_account(
        pool: &PgPool,
        account_id: Uuid,
        dto: &UpdateAccountDto,
    ) -> Result<Account, AppError> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }

        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts SET
                name = $2,
                account_type = $3,
                currency = $4,
                is_active = $5,
                description = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, account_type, balance, currency, is_active, description,
                      created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(&name)
        .bind(dto.account_type.as_str())
        .bind(dto.currency.to_uppercase())
        .bind(dto.is_active)
        .bind(&dto.description)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Delete an account.
    pub async fn delete_account(pool: &PgPool, account_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Ok(())
    }
}
