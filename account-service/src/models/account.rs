use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Account document as persisted in the accounts collection.
///
/// Only the Argon2 hash of the password is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A validated account waiting for the store to assign its id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn into_account(self, id: ObjectId) -> Account {
        Account {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

/// Parse a client-supplied account id. Anything but a 24 character hex
/// ObjectId is rejected.
pub fn parse_account_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}
