use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;
use validator::ValidationErrors;

use crate::dtos::CreateAccountRequest;

pub const BODY_MISSING_MESSAGE: &str = "Request body is missing or not JSON.";
pub const FIELDS_NOT_STRINGS_MESSAGE: &str = "Username, email, and password must be strings.";

/// JSON body of a create request.
///
/// Rejects a missing body, a body that is not JSON, and anything other than a
/// non-empty JSON object. Field presence is checked later by the service.
pub struct AccountPayload(pub CreateAccountRequest);

#[axum::async_trait]
impl<S> FromRequest<S> for AccountPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected account payload");
                AppError::BadRequest(anyhow::anyhow!(BODY_MISSING_MESSAGE))
            })?;

        match &value {
            Value::Object(fields) if !fields.is_empty() => {}
            _ => return Err(AppError::BadRequest(anyhow::anyhow!(BODY_MISSING_MESSAGE))),
        }

        let request = serde_json::from_value(value).map_err(|e| {
            tracing::debug!(error = %e, "Account payload has non-string fields");
            AppError::BadRequest(anyhow::anyhow!(FIELDS_NOT_STRINGS_MESSAGE))
        })?;

        Ok(AccountPayload(request))
    }
}

/// Render validation failures as `Account validation failed: field: reason, ...`
/// with fields sorted by name.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let reasons = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string())
                })
                .collect::<Vec<_>>()
                .join("; ");
            format!("{}: {}", field, reasons)
        })
        .collect();
    fields.sort();

    format!("Account validation failed: {}", fields.join(", "))
}
