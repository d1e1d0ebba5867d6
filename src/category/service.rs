use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Category, CategoryDto};
use crate::errors::AppError;

/// Service layer for category business logic.
pub struct CategoryService;

impl CategoryService {
    /// List all categories, sorted by name.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, category_type, color, icon, parent_category_id, budget,
                   created_at, updated_at
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Get a category by ID.
    pub async fn get_by_id(pool: &PgPool, category_id: Uuid) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, category_type, color, icon, parent_category_id, budget,
                   created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Create a new category.
    pub async fn create(pool: &PgPool, dto: &CategoryDto) -> Result<Category, AppError> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }

        // A parent reference must point at an existing category
        if let Some(parent_id) = dto.parent_category_id {
            Self::get_by_id(pool, parent_id)
                .await
                .map_err(|_| AppError::NotFound("Parent category not found".to_string()))?;
        }

        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, category_type, color, icon, parent_category_id, budget)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category_type, color, icon, parent_category_id, budget,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(dto.category_type.as_str())
        .bind(&dto.color)
        .bind(&dto.icon)
        .bind(dto.parent_category_id)
        .bind(dto.budget)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Replace an existing category (PUT semantics).
    pub async fn update(
        pool: &PgPool,
        category_id: Uuid,
        dto: &CategoryDto,
    ) -> Result<Category, AppError> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }

        if let Some(parent_id) = dto.parent_category_id {
            if parent_id == category_id {
                return Err(AppError::ValidationError(
                    "A category cannot be its own parent".to_string(),
                ));
            }
            Self::get_by_id(pool, parent_id)
                .await
                .map_err(|_| AppError::NotFound("Parent category not found".to_string()))?;
        }

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = $2,
                category_type = $3,
                color = $4,
                icon = $5,
                parent_category_id = $6,
                budget = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, category_type, color, icon, parent_category_id, budget,
                      created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(&name)
        .bind(dto.category_type.as_str())
        .bind(&dto.color)
        .bind(&dto.icon)
        .bind(dto.parent_category_id)
        .bind(dto.budget)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Delete a category.
    pub async fn delete(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        Ok(())
    }
}
