use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use super::store::{AccountStore, StoreError};
use crate::models::{Account, NewAccount};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed account store.
///
/// Constructed explicitly with [`MongoAccountStore::connect`] and shut down with
/// [`MongoAccountStore::close`].
#[derive(Clone)]
pub struct MongoAccountStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoAccountStore {
    /// Connect and ping the server so a bad URI or unreachable cluster fails
    /// at startup rather than on the first request.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        let store = Self {
            db: client.database(database),
            client,
            collection: collection.to_string(),
        };

        store.ping().await.map_err(|e| {
            tracing::error!("MongoDB is not reachable: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for account-service");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.accounts()
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection(&self.collection)
    }

    /// Close all pooled connections.
    pub async fn close(self) {
        tracing::info!("Closing MongoDB connections");
        self.client.shutdown().await;
    }

    async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        // ObjectIds lead with a seconds timestamp, so `_id` order approximates creation order.
        // Ids minted in the same second by different processes may interleave.
        let find_options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let cursor = self
            .accounts()
            .find(doc! {}, find_options)
            .await
            .map_err(backend_error)?;

        cursor.try_collect().await.map_err(backend_error)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Account>, StoreError> {
        self.accounts()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(backend_error)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let account = account.into_account(ObjectId::new());

        match self.accounts().insert_one(&account, None).await {
            Ok(_) => Ok(account),
            Err(e) => match duplicate_key_message(&e) {
                Some(message) => Err(StoreError::Duplicate {
                    field: duplicated_field(message),
                }),
                None => Err(backend_error(e)),
            },
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self
            .accounts()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(backend_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await.map_err(|e| {
            tracing::error!("MongoDB health check failed: {}", e);
            backend_error(e)
        })
    }
}

fn backend_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err))
}

fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            Some(write_error.message.as_str())
        }
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_CODE => {
            Some(command_error.message.as_str())
        }
        _ => None,
    }
}

/// Extract the field name from a server message such as
/// `E11000 duplicate key error collection: db.accounts index: email_unique_idx dup key: { email: "a@x.com" }`.
fn duplicated_field(message: &str) -> String {
    message
        .split_once("dup key: {")
        .and_then(|(_, rest)| rest.split_once(':'))
        .map(|(field, _)| field.trim().trim_matches('"').to_string())
        .filter(|field| !field.is_empty())
        .unwrap_or_else(|| "email".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicated_field_is_read_from_server_message() {
        let message = r#"E11000 duplicate key error collection: accounts_db.accounts index: email_unique_idx dup key: { email: "a@x.com" }"#;
        assert_eq!(duplicated_field(message), "email");

        let message = r#"E11000 duplicate key error collection: db.accounts index: username_1 dup key: { username: "alice" }"#;
        assert_eq!(duplicated_field(message), "username");
    }

    #[test]
    fn duplicated_field_defaults_to_email() {
        assert_eq!(duplicated_field("E11000 duplicate key error"), "email");
    }
}
