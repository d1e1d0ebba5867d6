pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{
    create_recurring, delete_recurring, get_recurring, list_recurring, update_recurring,
};
