use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};

use super::models::{
    AccountIdPath, AccountResponse, CreateAccountDto, DeleteResponse, UpdateAccountDto,
};
use super::service::AccountService;

/// GET /accounts - List all accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "Accounts",
    responses(
        (status = 200, description = "List of accounts", body = Vec<AccountResponse>)
    )
)]
#[get("/accounts")]
pub async fn list_accounts(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let accounts = AccountService::list_accounts(pool.get_ref()).await?;

    let response: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /accounts/{id} - Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    tag = "Accounts",
    params(AccountIdPath),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
#[get("/accounts/{id}")]
pub async fn get_account(
    pool: web::Data<PgPool>,
    path: web::Path<AccountIdPath>,
) -> Result<HttpResponse, AppError> {
    let account = AccountService::get_account_by_id(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// POST /accounts - Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "Accounts",
    request_body = CreateAccountDto,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[post("/accounts")]
pub async fn create_account(
    pool: web::Data<PgPool>,
    body: web::Json<CreateAccountDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = AccountService::create_account(pool.get_ref(), &body).await?;

    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// PUT /accounts/{id} - Replace an account's descriptive fields
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{id}",
    tag = "Accounts",
    params(AccountIdPath),
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
#[put("/accounts/{id}")]
pub async fn update_account(
    pool: web::Data<PgPool>,
    path: web::Path<AccountIdPath>,
    body: web::Json<UpdateAccountDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = AccountService::update_account(pool.get_ref(), path.id, &body).await?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// DELETE /accounts/{id} - Delete an account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    tag = "Accounts",
    params(AccountIdPath),
    responses(
        (status = 200, description = "Account deleted", body = DeleteResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
#[delete("/accounts/{id}")]
pub async fn delete_account(
    pool: web::Data<PgPool>,
    path: web::Path<AccountIdPath>,
) -> Result<HttpResponse, AppError> {
    AccountService::delete_account(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Account deleted successfully".to_string(),
        id: path.id,
    }))
}
