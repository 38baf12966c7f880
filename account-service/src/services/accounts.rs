//! Account operations: input validation, store calls and mapping of store
//! outcomes onto the HTTP error taxonomy.

use service_core::error::AppError;
use std::sync::Arc;
use validator::Validate;

use super::metrics::{record_account_conflict, record_account_created, record_account_deleted};
use super::store::{AccountStore, StoreError};
use crate::dtos::CreateAccountRequest;
use crate::models::{parse_account_id, Account, NewAccount};
use crate::utils::{describe_validation_errors, hash_password, Password};

pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const INVALID_ACCOUNT_ID: &str = "Invalid account id.";
pub const FIELDS_REQUIRED: &str = "Username, email, and password are required.";

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Account>, AppError> {
        self.store.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list accounts");
            AppError::InternalError(anyhow::anyhow!(
                "An error occurred while fetching accounts."
            ))
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Account, AppError> {
        let object_id = parse_id(id)?;

        self.store
            .find_by_id(object_id)
            .await
            .map_err(|e| {
                tracing::error!(account_id = %id, error = %e, "Failed to fetch account");
                AppError::InternalError(anyhow::anyhow!(
                    "An error occurred while fetching the account."
                ))
            })?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!(ACCOUNT_NOT_FOUND)))
    }

    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, AppError> {
        let input = request
            .into_input()
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(FIELDS_REQUIRED)))?;

        input
            .validate()
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(describe_validation_errors(&e))))?;

        let password = Password::new(input.password);
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(anyhow::Error::new)
            .and_then(|hashed| hashed)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                unexpected_create_error()
            })?;

        let new_account = NewAccount {
            username: input.username,
            email: input.email,
            password_hash,
        };

        match self.store.insert(new_account).await {
            Ok(account) => {
                record_account_created();
                tracing::info!(account_id = %account.id, "Account created");
                Ok(account)
            }
            Err(StoreError::Duplicate { field }) => {
                record_account_conflict(&field);
                tracing::info!(field = %field, "Rejected duplicate account");
                Err(AppError::Conflict(anyhow::anyhow!(
                    "An account with that {} already exists.",
                    field
                )))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create account");
                Err(unexpected_create_error())
            }
        }
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        let object_id = parse_id(id)?;

        let deleted = self.store.delete_by_id(object_id).await.map_err(|e| {
            tracing::error!(account_id = %id, error = %e, "Failed to delete account");
            AppError::InternalError(anyhow::anyhow!(
                "An error occurred while deleting the account."
            ))
        })?;

        if !deleted {
            return Err(AppError::NotFound(anyhow::anyhow!(ACCOUNT_NOT_FOUND)));
        }

        record_account_deleted();
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<mongodb::bson::oid::ObjectId, AppError> {
    parse_account_id(id).ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(INVALID_ACCOUNT_ID)))
}

fn unexpected_create_error() -> AppError {
    AppError::InternalError(anyhow::anyhow!(
        "An unexpected error occurred while creating the account."
    ))
}
