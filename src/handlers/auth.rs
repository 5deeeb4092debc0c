use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// Credentials exchanged for a token
#[derive(Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Send as `Authorization: Token <token>`
    pub token: String,
}

/// Obtain the API token for an account
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let token = state
        .tokens
        .issue_token(request.email.as_deref(), request.password.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(
        TokenResponse { token: token.key },
        "Token issued successfully",
    )))
}

/// Revoke the caller's token. The next exchange issues a new one.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/token",
    tag = "auth",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, account))]
pub async fn revoke_token(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if let Some(key) = state.tokens.revoke_token(account.id).await? {
        state.token_cache.invalidate(&key).await;
    }

    Ok(Json(ApiResponse::ok(
        format!("Token for user {} revoked", account.id),
        "Token revoked successfully",
    )))
}
