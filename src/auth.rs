//! Token authentication for protected endpoints.
//!
//! Clients send `Authorization: Token <key>` with the key obtained from the
//! token endpoint.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};
use domain::DomainError;
use model::entities::user;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

const TOKEN_SCHEME: &str = "token";

/// The account behind the request's token
#[derive(Debug)]
pub struct AuthAccount(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::MissingToken)?;
        let key = extract_token(header)?;

        match resolve_account(state, key).await? {
            Some(account) => {
                debug!("Request authenticated as user {}", account.id);
                Ok(AuthAccount(account))
            }
            None => {
                warn!("Request with unknown token");
                Err(ApiError::InvalidToken)
            }
        }
    }
}

/// Extracts the key from a `Token <key>` header value.
pub fn extract_token(header: &HeaderValue) -> Result<&str, ApiError> {
    let value = header.to_str().map_err(|_| ApiError::InvalidToken)?;
    let (scheme, key) = value.trim().split_once(' ').ok_or(ApiError::InvalidToken)?;
    let key = key.trim();
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) || key.is_empty() || key.contains(' ') {
        return Err(ApiError::InvalidToken);
    }
    Ok(key)
}

/// Resolves a token key to its active account, consulting the cache first.
async fn resolve_account(state: &AppState, key: &str) -> Result<Option<user::Model>, DomainError> {
    if let Some(account_id) = state.token_cache.get(key).await {
        let account = state
            .accounts
            .find_account(account_id)
            .await?
            .filter(|account| account.is_active);
        if account.is_none() {
            state.token_cache.invalidate(key).await;
        }
        return Ok(account);
    }

    let account = state.tokens.resolve_token(key).await?;
    if let Some(account) = &account {
        state.token_cache.insert(key.to_string(), account.id).await;
    }
    Ok(account)
}
