pub mod config;
pub mod gateway;
pub mod sheets;
pub mod users;
