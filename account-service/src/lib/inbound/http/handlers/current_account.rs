use axum::http::StatusCode;
use axum::Extension;

use super::login::AuthenticatedAccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AuthenticatedAccount;

/// Return the caller's identity and current token pair.
///
/// The middleware has already resolved the credential header; when the
/// access token had expired, the returned token is the silently refreshed
/// one.
pub async fn current_account(
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<AuthenticatedAccountData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticatedAccountData::from(&account),
    ))
}
