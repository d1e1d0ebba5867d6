use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::account::models::DeleteResponse;
use crate::errors::{AppError, ErrorResponse};

use super::models::{
    FlowData, FlowQuery, MonthlyReport, PaginatedTransactionResponse, ReportPath, TransactionDto,
    TransactionFilters, TransactionIdPath, TransactionResponse,
};
use super::service::TransactionService;

/// GET /transactions - List transactions with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "Transactions",
    params(TransactionFilters),
    responses(
        (status = 200, description = "Paginated list of transactions", body = PaginatedTransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    query: web::Query<TransactionFilters>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (transactions, total) =
        TransactionService::list_transactions(pool.get_ref(), &query).await?;

    let response: Vec<TransactionResponse> = transactions.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(PaginatedTransactionResponse {
        data: response,
        total,
        page: query.page,
        limit: query.limit,
    }))
}

/// GET /transactions/sankey - Flow-diagram data for a date window
#[utoipa::path(
    get,
    path = "/api/v1/transactions/sankey",
    tag = "Reports",
    params(FlowQuery),
    responses(
        (status = 200, description = "Node/edge flow structure", body = FlowData)
    )
)]
#[get("/transactions/sankey")]
pub async fn get_sankey_data(
    pool: web::Data<PgPool>,
    query: web::Query<FlowQuery>,
) -> Result<HttpResponse, AppError> {
    let flow_data =
        TransactionService::flow_data(pool.get_ref(), query.start_date, query.end_date).await?;

    Ok(HttpResponse::Ok().json(flow_data))
}

/// GET /transactions/report/{year}/{month} - Monthly income/expense report
#[utoipa::path(
    get,
    path = "/api/v1/transactions/report/{year}/{month}",
    tag = "Reports",
    params(ReportPath),
    responses(
        (status = 200, description = "Monthly report", body = MonthlyReport),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    )
)]
#[get("/transactions/report/{year}/{month}")]
pub async fn get_monthly_report(
    pool: web::Data<PgPool>,
    path: web::Path<ReportPath>,
) -> Result<HttpResponse, AppError> {
    let report = TransactionService::monthly_report(pool.get_ref(), path.year, path.month).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// GET /transactions/{id} - Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction details", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    pool: web::Data<PgPool>,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction = TransactionService::get_transaction(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// POST /transactions - Create a new transaction (adjusts the account balance)
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "Transactions",
    request_body = TransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
#[post("/transactions")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(TransactionResponse::from(transaction)))
}

/// PUT /transactions/{id} - Replace a transaction (adjusts balances by the delta difference)
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = TransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction or account not found", body = ErrorResponse)
    )
)]
#[put("/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    path: web::Path<TransactionIdPath>,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transaction =
        TransactionService::update_transaction(pool.get_ref(), path.id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// DELETE /transactions/{id} - Delete a transaction (reverses its balance effect)
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted", body = DeleteResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), path.id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Transaction deleted successfully".to_string(),
        id: path.id,
    }))
}
