use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::account::errors::AccountError;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Middleware resolving the dual-token credential header.
///
/// The `Authorization` value is a `;`-separated list of `"<prefix> <token>"`
/// pairs; both configured prefixes must be present. On success the
/// authenticated account (with a silently refreshed access token when the
/// presented one had expired) is stored in the request extensions.
pub async fn authenticate<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let (access_token, refresh_token) = extract_credential_tokens(
        &req,
        &state.token_prefix,
        &state.refresh_token_prefix,
    )?;

    let authenticated = state
        .account_service
        .authorize(&access_token, &refresh_token)
        .await
        .map_err(|e| match e {
            AccountError::Unauthorized(message) => {
                tracing::warn!("Authorization failed: {}", message);
                unauthorized(message)
            }
            other => {
                tracing::error!("Authorization errored: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response()
            }
        })?;

    req.extensions_mut().insert(authenticated);

    Ok(next.run(req).await)
}

/// Parse the access and refresh tokens out of the credential header.
fn extract_credential_tokens(
    req: &Request,
    token_prefix: &str,
    refresh_token_prefix: &str,
) -> Result<(String, String), Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    let mut access_token = None;
    let mut refresh_token = None;
    for pair in auth_str.split(';') {
        let mut parts = pair.trim().splitn(2, ' ');
        let (Some(prefix), Some(token)) = (parts.next(), parts.next()) else {
            continue;
        };
        if prefix == token_prefix {
            access_token = Some(token.trim().to_string());
        } else if prefix == refresh_token_prefix {
            refresh_token = Some(token.trim().to_string());
        }
    }

    match (access_token, refresh_token) {
        (Some(access), Some(refresh)) => Ok((access, refresh)),
        _ => Err(unauthorized("Invalid Authorization header")),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
