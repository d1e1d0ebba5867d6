use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    CategoryTotal, CategoryTotalRow, FlowData, FlowLink, FlowNode, FlowNodeRow, MonthlyReport,
    ReportTotalsRow, Transaction, TransactionDto, TransactionFilters, TransactionType,
    TransactionWithCategory,
};
use crate::errors::AppError;

/// Service layer for transaction business logic.
/// Transaction writes and the matching account balance adjustment always
/// share one database transaction.
pub struct TransactionService;

/// Indicates whether to apply or reverse a balance effect
#[derive(Debug, Clone, Copy)]
enum BalanceOperation {
    Apply,
    Reverse,
}

const TX_WITH_CATEGORY_COLUMNS: &str = r#"
    t.id, t.amount, t.description, t.date, t.category_id, t.account_id,
    t.transaction_type, t.tags, t.notes, t.recurring_id, t.created_at, t.updated_at,
    c.name AS category_name, c.category_type AS category_type,
    c.color AS category_color, c.icon AS category_icon
"#;

impl TransactionService {
    /// Create a transaction and apply its signed delta to the account balance.
    pub async fn create_transaction(
        pool: &PgPool,
        dto: TransactionDto,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        // The referenced account must exist before anything is written
        let account_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1 FOR UPDATE)",
        )
        .bind(dto.account_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !account_exists {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (amount, description, date, category_id, account_id, transaction_type,
                 tags, notes, recurring_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, amount, description, date, category_id, account_id,
                      transaction_type, tags, notes, recurring_id, created_at, updated_at
            "#,
        )
        .bind(dto.amount)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.category_id)
        .bind(dto.account_id)
        .bind(dto.transaction_type.as_str())
        .bind(&dto.tags)
        .bind(&dto.notes)
        .bind(dto.recurring_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Self::update_account_balance(
            &mut tx,
            dto.account_id,
            dto.amount,
            dto.transaction_type,
            BalanceOperation::Apply,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(transaction)
    }

    /// Get a single transaction by ID, with its category embedded.
    pub async fn get_transaction(
        pool: &PgPool,
        transaction_id: Uuid,
    ) -> Result<TransactionWithCategory, AppError> {
        sqlx::query_as::<_, TransactionWithCategory>(&format!(
            r#"
            SELECT {TX_WITH_CATEGORY_COLUMNS}
            FROM transactions t
            LEFT JOIN categories c ON t.category_id = c.id
            WHERE t.id = $1
            "#
        ))
        .bind(transaction_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// List transactions with filters and page/limit pagination.
    pub async fn list_transactions(
        pool: &PgPool,
        filters: &TransactionFilters,
    ) -> Result<(Vec<TransactionWithCategory>, i64), AppError> {
        // `limit` is already bounded to 1-100 by the filter validator
        let limit = filters.limit;
        let offset = (filters.page - 1) * limit;
        let type_filter = filters.transaction_type.map(|t| t.as_str());

        let transactions = sqlx::query_as::<_, TransactionWithCategory>(&format!(
            r#"
            SELECT {TX_WITH_CATEGORY_COLUMNS}
            FROM transactions t
            LEFT JOIN categories c ON t.category_id = c.id
            WHERE ($1::date IS NULL OR t.date >= $1)
              AND ($2::date IS NULL OR t.date <= $2)
              AND ($3::text IS NULL OR t.transaction_type = $3)
              AND ($4::uuid IS NULL OR t.category_id = $4)
              AND ($5::uuid IS NULL OR t.account_id = $5)
            ORDER BY t.date DESC, t.created_at DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(type_filter)
        .bind(filters.category_id)
        .bind(filters.account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
            WHERE ($1::date IS NULL OR t.date >= $1)
              AND ($2::date IS NULL OR t.date <= $2)
              AND ($3::text IS NULL OR t.transaction_type = $3)
              AND ($4::uuid IS NULL OR t.category_id = $4)
              AND ($5::uuid IS NULL OR t.account_id = $5)
            "#,
        )
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(type_filter)
        .bind(filters.category_id)
        .bind(filters.account_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok((transactions, total))
    }

    /// Replace a transaction, adjusting account balances for the difference.
    ///
    /// When the account reference changes, the old delta is reversed on the
    /// old account and the new delta applied to the new one, so no balance
    /// is left stale.
    pub async fn update_transaction(
        pool: &PgPool,
        transaction_id: Uuid,
        dto: TransactionDto,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let old = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, amount, description, date, category_id, account_id,
                   transaction_type, tags, notes, recurring_id, created_at, updated_at
            FROM transactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        let account_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1 FOR UPDATE)",
        )
        .bind(dto.account_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !account_exists {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Self::adjust_balances_for_update(&mut tx, &old, &dto).await?;

        let updated = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                amount = $2,
                description = $3,
                date = $4,
                category_id = $5,
                account_id = $6,
                transaction_type = $7,
                tags = $8,
                notes = $9,
                recurring_id = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, amount, description, date, category_id, account_id,
                      transaction_type, tags, notes, recurring_id, created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(dto.amount)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.category_id)
        .bind(dto.account_id)
        .bind(dto.transaction_type.as_str())
        .bind(&dto.tags)
        .bind(&dto.notes)
        .bind(dto.recurring_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(updated)
    }

    /// Delete a transaction, reversing its balance effect first.
    pub async fn delete_transaction(pool: &PgPool, transaction_id: Uuid) -> Result<(), AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let old = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, amount, description, date, category_id, account_id,
                   transaction_type, tags, notes, recurring_id, created_at, updated_at
            FROM transactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        // The UPDATE is a no-op when the account has since been deleted
        Self::update_account_balance(
            &mut tx,
            old.account_id,
            old.amount,
            old.get_type(),
            BalanceOperation::Reverse,
        )
        .await?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(())
    }

    /// Monthly report: income/expense sums and a per-category breakdown
    /// over `[first of month, first of next month)`.
    pub async fn monthly_report(
        pool: &PgPool,
        year: i32,
        month: u32,
    ) -> Result<MonthlyReport, AppError> {
        let (start, end) = Self::month_range(year, month)?;

        let totals = sqlx::query_as::<_, ReportTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN transaction_type = 'income' THEN amount ELSE 0 END), 0) AS income,
                COALESCE(SUM(CASE WHEN transaction_type = 'expense' THEN amount ELSE 0 END), 0) AS expenses
            FROM transactions
            WHERE date >= $1 AND date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let by_category_rows = sqlx::query_as::<_, CategoryTotalRow>(
            r#"
            SELECT
                COALESCE(c.name, 'Uncategorized') AS category,
                COALESCE(SUM(t.amount), 0) AS total
            FROM transactions t
            LEFT JOIN categories c ON t.category_id = c.id
            WHERE t.date >= $1 AND t.date < $2
            GROUP BY t.category_id, c.name
            ORDER BY total DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(MonthlyReport {
            income: totals.income.unwrap_or(Decimal::ZERO),
            expenses: totals.expenses.unwrap_or(Decimal::ZERO),
            by_category: by_category_rows
                .into_iter()
                .map(|row| CategoryTotal {
                    category: row.category,
                    total: row.total.unwrap_or(Decimal::ZERO),
                })
                .collect(),
        })
    }

    /// Flow-diagram data: categories and accounts as nodes, per
    /// (category, account, type) transaction sums in the window as links.
    pub async fn flow_data(
        pool: &PgPool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FlowData, AppError> {
        let today = Utc::now().date_naive();
        let start = start_date.unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
        });
        let end = end_date.unwrap_or(today);

        let links = sqlx::query_as::<_, FlowLink>(
            r#"
            SELECT
                category_id AS source,
                account_id AS target,
                COALESCE(SUM(amount), 0) AS value,
                transaction_type
            FROM transactions
            WHERE date >= $1 AND date <= $2
            GROUP BY category_id, account_id, transaction_type
            ORDER BY value DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let category_nodes =
            sqlx::query_as::<_, FlowNodeRow>("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(pool)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

        let account_nodes =
            sqlx::query_as::<_, FlowNodeRow>("SELECT id, name FROM accounts ORDER BY name ASC")
                .fetch_all(pool)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

        let nodes = category_nodes
            .into_iter()
            .map(|row| FlowNode {
                id: row.id,
                name: row.name,
                node_type: "category".to_string(),
            })
            .chain(account_nodes.into_iter().map(|row| FlowNode {
                id: row.id,
                name: row.name,
                node_type: "account".to_string(),
            }))
            .collect();

        Ok(FlowData { nodes, links })
    }

    /// Compute the date window `[first of month, first of next month)`.
    fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::ValidationError("Month must be between 1 and 12".to_string()))?;

        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::ValidationError("Month must be between 1 and 12".to_string()))?;

        Ok((start, end))
    }

    /// Adjust account balances for a replace. Same account: apply the net
    /// difference. Different account: reverse on old, apply on new.
    async fn adjust_balances_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        old: &Transaction,
        new: &TransactionDto,
    ) -> Result<(), AppError> {
        let old_effect = Self::calculate_balance_effect(old.amount, old.get_type());
        let new_effect = Self::calculate_balance_effect(new.amount, new.transaction_type);

        if old.account_id == new.account_id {
            let net_change = new_effect - old_effect;

            if net_change != Decimal::ZERO {
                sqlx::query(
                    "UPDATE accounts SET balance = balance + $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(net_change)
                .bind(old.account_id)
                .execute(&mut **tx)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            }
        } else {
            // The new account is already locked by the existence check;
            // lock the old account too before touching either balance
            sqlx::query("SELECT 1 FROM accounts WHERE id = $1 FOR UPDATE")
                .bind(old.account_id)
                .execute(&mut **tx)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

            Self::update_account_balance(
                tx,
                old.account_id,
                old.amount,
                old.get_type(),
                BalanceOperation::Reverse,
            )
            .await?;

            Self::update_account_balance(
                tx,
                new.account_id,
                new.amount,
                new.transaction_type,
                BalanceOperation::Apply,
            )
            .await?;
        }

        Ok(())
    }

    /// Signed effect of a transaction on its account balance
    fn calculate_balance_effect(amount: Decimal, transaction_type: TransactionType) -> Decimal {
        match transaction_type {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
            TransactionType::Transfer => Decimal::ZERO,
        }
    }

    /// Apply or reverse a transaction's balance effect on an account
    async fn update_account_balance(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account_id: Uuid,
        amount: Decimal,
        transaction_type: TransactionType,
        operation: BalanceOperation,
    ) -> Result<(), AppError> {
        let effect = Self::calculate_balance_effect(amount, transaction_type);

        let adjustment = match operation {
            BalanceOperation::Apply => effect,
            BalanceOperation::Reverse => -effect,
        };

        if adjustment != Decimal::ZERO {
            sqlx::query(
                "UPDATE accounts SET balance = balance + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(adjustment)
            .bind(account_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_effect_is_positive() {
        let amount = Decimal::new(12550, 2); // 125.50
        let effect = TransactionService::calculate_balance_effect(amount, TransactionType::Income);
        assert_eq!(effect, amount);
    }

    #[test]
    fn expense_effect_is_negative() {
        let amount = Decimal::new(8000, 2); // 80.00
        let effect = TransactionService::calculate_balance_effect(amount, TransactionType::Expense);
        assert_eq!(effect, -amount);
    }

    #[test]
    fn transfer_has_no_effect() {
        let amount = Decimal::new(99999, 2);
        let effect =
            TransactionService::calculate_balance_effect(amount, TransactionType::Transfer);
        assert_eq!(effect, Decimal::ZERO);
    }

    #[test]
    fn month_range_covers_whole_month() {
        let (start, end) = TransactionService::month_range(2025, 6).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn month_range_rolls_over_december() {
        let (start, end) = TransactionService::month_range(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn month_range_rejects_invalid_month() {
        assert!(TransactionService::month_range(2025, 0).is_err());
        assert!(TransactionService::month_range(2025, 13).is_err());
    }
}
