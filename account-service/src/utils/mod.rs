pub mod password;
pub mod validation;

pub use password::{hash_password, Password};
pub use validation::{describe_validation_errors, AccountPayload};
