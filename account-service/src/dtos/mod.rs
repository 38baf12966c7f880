pub mod accounts;

pub use accounts::{AccountResponse, CreateAccountRequest, NewAccountInput};
pub use service_core::error::ErrorResponse;
