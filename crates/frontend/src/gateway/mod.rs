pub mod api;
pub mod error;

pub use error::GatewayError;
