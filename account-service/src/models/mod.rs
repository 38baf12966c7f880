pub mod account;

pub use account::{parse_account_id, Account, NewAccount};
