use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::dtos::AccountResponse;
use crate::startup::AppState;
use crate::utils::AccountPayload;

/// List all accounts
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "All accounts in creation order", body = [AccountResponse]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
#[tracing::instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Fetch one account
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = String, Path, description = "Account id (24 hex characters)")),
    responses(
        (status = 200, description = "The account", body = AccountResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
#[tracing::instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.get_by_id(&id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse,
            headers(("Location" = String, description = "URL of the new account"))),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
#[tracing::instrument(skip_all)]
pub async fn create_account(
    State(state): State<AppState>,
    AccountPayload(request): AccountPayload,
) -> Result<impl IntoResponse, AppError> {
    let account = state.accounts.create(request).await?;
    let location = format!("/accounts/{}", account.id.to_hex());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AccountResponse::from(account)),
    ))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(("id" = String, Path, description = "Account id (24 hex characters)")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.accounts.delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
