pub mod consumer;
pub mod models;
pub mod requests;
pub mod sender;
pub mod source;
pub mod store;
