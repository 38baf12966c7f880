use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::store::{AccountStore, StoreError};
use crate::models::{Account, NewAccount};

/// Account store kept in process memory. Used by tests and `ACCOUNT_STORE=memory`.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|account| account.id == id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        // Write lock spans the uniqueness check and the push
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|existing| existing.email == account.email) {
            return Err(StoreError::Duplicate {
                field: "email".to_string(),
            });
        }

        let account = account.into_account(ObjectId::new());
        accounts.push(account.clone());
        Ok(account)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|account| account.id != id);
        Ok(accounts.len() != before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = InMemoryAccountStore::new();
        let first = store.insert(new_account("first@x.com")).await.unwrap();
        let second = store.insert(new_account("second@x.com")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryAccountStore::new();
        store.insert(new_account("a@x.com")).await.unwrap();

        let err = store.insert(new_account("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field } if field == "email"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_email_keep_one_record() {
        let store = Arc::new(InMemoryAccountStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(new_account("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_matched() {
        let store = InMemoryAccountStore::new();
        let account = store.insert(new_account("a@x.com")).await.unwrap();

        assert!(store.delete_by_id(account.id).await.unwrap());
        assert!(!store.delete_by_id(account.id).await.unwrap());
        assert!(store.find_by_id(account.id).await.unwrap().is_none());
    }
}
