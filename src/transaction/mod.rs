pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{
    create_transaction, delete_transaction, get_monthly_report, get_sankey_data, get_transaction,
    list_transactions, update_transaction,
};
