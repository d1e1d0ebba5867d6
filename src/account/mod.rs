pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{create_account, delete_account, get_account, list_accounts, update_account};
