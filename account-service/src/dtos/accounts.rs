use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Account;

/// Body of `POST /accounts`. Fields are optional so a missing field can be
/// reported as such instead of as a JSON error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "alice", min_length = 3, max_length = 50)]
    pub username: Option<String>,

    #[schema(example = "a@x.com", min_length = 5, max_length = 255)]
    pub email: Option<String>,

    #[schema(example = "secret1", min_length = 5, max_length = 1024)]
    pub password: Option<String>,
}

impl CreateAccountRequest {
    /// Returns the three fields when all are present and non-empty.
    pub fn into_input(self) -> Option<NewAccountInput> {
        let present = |field: Option<String>| field.filter(|value| !value.is_empty());

        Some(NewAccountInput {
            username: present(self.username)?,
            email: present(self.email)?,
            password: present(self.password)?,
        })
    }
}

/// Account fields checked against the persistence constraints before any store call.
#[derive(Debug, Clone, Validate)]
pub struct NewAccountInput {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(length(min = 5, max = 255, message = "must be between 5 and 255 characters"))]
    pub email: String,

    #[validate(length(min = 5, max = 1024, message = "must be between 5 and 1024 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "65f1c2a4e13b5a0d9c8b4567")]
    pub id: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_hex(),
            username: account.username,
            email: account.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: Option<&str>, email: Option<&str>, password: Option<&str>) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn into_input_requires_every_field() {
        assert!(request(Some("alice"), Some("a@x.com"), Some("secret1"))
            .into_input()
            .is_some());
        assert!(request(None, Some("a@x.com"), Some("secret1"))
            .into_input()
            .is_none());
        assert!(request(Some("alice"), Some(""), Some("secret1"))
            .into_input()
            .is_none());
        assert!(request(Some("alice"), Some("a@x.com"), None)
            .into_input()
            .is_none());
    }

    #[test]
    fn length_rules_count_characters() {
        let input = NewAccountInput {
            username: "ééé".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(input.validate().is_ok());

        let too_short = NewAccountInput {
            username: "al".to_string(),
            ..input.clone()
        };
        assert!(too_short.validate().is_err());

        let too_long = NewAccountInput {
            username: "a".repeat(51),
            ..input
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn response_never_carries_the_password() {
        let account = Account {
            id: mongodb::bson::oid::ObjectId::new(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        };
        let id = account.id.to_hex();

        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": id, "username": "alice", "email": "a@x.com" })
        );
    }
}
