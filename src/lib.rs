pub mod account;
pub mod category;
pub mod errors;
pub mod openapi;
pub mod recurring;
pub mod transaction;
