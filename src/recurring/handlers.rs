use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::account::models::DeleteResponse;
use crate::errors::{AppError, ErrorResponse};

use super::models::{RecurringIdPath, RecurringTransactionDto, RecurringTransactionResponse};
use super::service::RecurringService;

/// GET /recurring - List all recurring transaction templates
#[utoipa::path(
    get,
    path = "/api/v1/recurring",
    tag = "Recurring",
    responses(
        (status = 200, description = "List of recurring templates", body = Vec<RecurringTransactionResponse>)
    )
)]
#[get("/recurring")]
pub async fn list_recurring(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let templates = RecurringService::list_recurring(pool.get_ref()).await?;

    let response: Vec<RecurringTransactionResponse> =
        templates.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /recurring/{id} - Get a specific recurring template by ID
#[utoipa::path(
    get,
    path = "/api/v1/recurring/{id}",
    tag = "Recurring",
    params(RecurringIdPath),
    responses(
        (status = 200, description = "Recurring template details", body = RecurringTransactionResponse),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse)
    )
)]
#[get("/recurring/{id}")]
pub async fn get_recurring(
    pool: web::Data<PgPool>,
    path: web::Path<RecurringIdPath>,
) -> Result<HttpResponse, AppError> {
    let template = RecurringService::get_by_id(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(RecurringTransactionResponse::from(template)))
}

/// POST /recurring - Create a new recurring template
#[utoipa::path(
    post,
    path = "/api/v1/recurring",
    tag = "Recurring",
    request_body = RecurringTransactionDto,
    responses(
        (status = 201, description = "Recurring template created", body = RecurringTransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Account or category not found", body = ErrorResponse)
    )
)]
#[post("/recurring")]
pub async fn create_recurring(
    pool: web::Data<PgPool>,
    body: web::Json<RecurringTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    body.validate_date_order()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let template = RecurringService::create(pool.get_ref(), &body).await?;

    Ok(HttpResponse::Created().json(RecurringTransactionResponse::from(template)))
}

/// PUT /recurring/{id} - Replace a recurring template
#[utoipa::path(
    put,
    path = "/api/v1/recurring/{id}",
    tag = "Recurring",
    params(RecurringIdPath),
    request_body = RecurringTransactionDto,
    responses(
        (status = 200, description = "Recurring template updated", body = RecurringTransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse)
    )
)]
#[put("/recurring/{id}")]
pub async fn update_recurring(
    pool: web::Data<PgPool>,
    path: web::Path<RecurringIdPath>,
    body: web::Json<RecurringTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    body.validate_date_order()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let template = RecurringService::update(pool.get_ref(), path.id, &body).await?;

    Ok(HttpResponse::Ok().json(RecurringTransactionResponse::from(template)))
}

/// DELETE /recurring/{id} - Delete a recurring template
#[utoipa::path(
    delete,
    path = "/api/v1/recurring/{id}",
    tag = "Recurring",
    params(RecurringIdPath),
    responses(
        (status = 200, description = "Recurring template deleted", body = DeleteResponse),
        (status = 404, description = "Recurring transaction not found", body = ErrorResponse)
    )
)]
#[delete("/recurring/{id}")]
pub async fn delete_recurring(
    pool: web::Data<PgPool>,
    path: web::Path<RecurringIdPath>,
) -> Result<HttpResponse, AppError> {
    RecurringService::delete(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Recurring transaction deleted successfully".to_string(),
        id: path.id,
    }))
}
