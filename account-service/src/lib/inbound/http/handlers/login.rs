use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AuthenticatedAccount;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<AuthenticatedAccountData>, ApiError> {
    // A malformed email can never belong to an account; treat it as a
    // failed login rather than a validation error
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let authenticated = state
        .account_service
        .login(LoginCommand::new(email, body.password))
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticatedAccountData::from(&authenticated),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

/// Identity plus both token strings, as returned by login and the
/// current-account endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedAccountData {
    pub email: String,
    pub username: String,
    pub token: String,
    pub refresh_token: String,
}

impl From<&AuthenticatedAccount> for AuthenticatedAccountData {
    fn from(account: &AuthenticatedAccount) -> Self {
        Self {
            email: account.email.clone(),
            username: account.username.clone(),
            token: account.token.clone(),
            refresh_token: account.refresh_token.clone(),
        }
    }
}
