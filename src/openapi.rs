use utoipa::OpenApi;

use crate::account::models::{
    AccountResponse, AccountType, CreateAccountDto, DeleteResponse, UpdateAccountDto,
};
use crate::category::models::{CategoryDto, CategoryResponse, CategoryType};
use crate::errors::ErrorResponse;
use crate::recurring::models::{Frequency, RecurringTransactionDto, RecurringTransactionResponse};
use crate::transaction::models::{
    CategoryTotal, EmbeddedCategoryInfo, FlowData, FlowLink, FlowNode, MonthlyReport,
    PaginatedTransactionResponse, TransactionDto, TransactionResponse, TransactionType,
};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finflow API",
        version = "1.0.0",
        description = "Personal-finance tracking API: accounts, transactions, categories and aggregate reporting",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8787", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Accounts", description = "Financial account management"),
        (name = "Categories", description = "Transaction category management"),
        (name = "Transactions", description = "Transaction management with balance maintenance"),
        (name = "Reports", description = "Aggregate reporting and flow-diagram data"),
        (name = "Recurring", description = "Recurring transaction templates")
    ),
    paths(
        // Account endpoints
        crate::account::handlers::list_accounts,
        crate::account::handlers::get_account,
        crate::account::handlers::create_account,
        crate::account::handlers::update_account,
        crate::account::handlers::delete_account,
        // Category endpoints
        crate::category::handlers::list_categories,
        crate::category::handlers::get_category,
        crate::category::handlers::create_category,
        crate::category::handlers::update_category,
        crate::category::handlers::delete_category,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_sankey_data,
        crate::transaction::handlers::get_monthly_report,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Recurring template endpoints
        crate::recurring::handlers::list_recurring,
        crate::recurring::handlers::get_recurring,
        crate::recurring::handlers::create_recurring,
        crate::recurring::handlers::update_recurring,
        crate::recurring::handlers::delete_recurring,
    ),
    components(
        schemas(
            // Error response
            ErrorResponse,
            // Account schemas
            AccountType,
            AccountResponse,
            CreateAccountDto,
            UpdateAccountDto,
            DeleteResponse,
            // Category schemas
            CategoryType,
            CategoryResponse,
            CategoryDto,
            // Transaction schemas
            TransactionType,
            TransactionResponse,
            EmbeddedCategoryInfo,
            PaginatedTransactionResponse,
            TransactionDto,
            // Report schemas
            MonthlyReport,
            CategoryTotal,
            FlowData,
            FlowNode,
            FlowLink,
            // Recurring schemas
            Frequency,
            RecurringTransactionResponse,
            RecurringTransactionDto,
        )
    )
)]
pub struct ApiDoc;
