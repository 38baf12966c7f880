pub mod accounts;
pub mod health;
pub mod metrics;

pub use accounts::{create_account, delete_account, get_account, list_accounts};
pub use health::{health_check, readiness_check};
