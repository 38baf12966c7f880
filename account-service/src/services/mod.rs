pub mod accounts;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use accounts::AccountService;
pub use database::MongoAccountStore;
pub use memory::InMemoryAccountStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::{AccountStore, StoreError};
