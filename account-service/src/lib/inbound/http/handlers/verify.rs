use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Account;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<VerifyResponseData>, ApiError> {
    state
        .account_service
        .verify_account(&token)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<&Account> for VerifyResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            is_verified: account.is_verified,
        }
    }
}
