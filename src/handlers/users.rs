use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use domain::{access::authorize, AccountBackend, AccountChanges, NewAccount};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new user
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Email address, used to log in (must be unique)
    #[validate(length(max = 255))]
    pub email: String,
    /// Password, at least 4 characters
    pub password: String,
    /// Display name
    #[validate(length(max = 50))]
    pub name: Option<String>,
}

/// Request body for updating a user. Omitted fields are left unchanged.
#[derive(Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub name: Option<String>,
    /// New password, stored hashed
    pub password: Option<String>,
}

/// User response model. The password hash is never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid email, short password or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");

    let mut new_account = NewAccount::new(request.email, request.password);
    if let Some(name) = request.name {
        new_account = new_account.with_name(name);
    }

    let account = state.accounts.create_account(new_account).await?;
    info!("User registered with ID: {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(account), "User created successfully")),
    ))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = state.accounts.list_accounts().await?;
    debug!("Retrieved {} users from database", users.len());

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Users retrieved successfully")))
}

/// Loads the target account and checks the requester may act on it.
async fn accessible_account(
    state: &AppState,
    requester: &user::Model,
    user_id: i32,
) -> Result<user::Model, ApiError> {
    let target = state
        .accounts
        .find_account(user_id)
        .await?
        .ok_or_else(|| domain::DomainError::not_found("User", user_id))?;
    authorize(requester, &target)?;
    Ok(target)
}

/// Get a user. Only the user themselves or a superuser may read it.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not allowed to access this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, requester))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthAccount(requester): AuthAccount,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account = accessible_account(&state, &requester, user_id).await?;
    debug!("User {} read by {}", user_id, requester.id);

    Ok(Json(ApiResponse::ok(UserResponse::from(account), "User retrieved successfully")))
}

/// Update a user (PUT or PATCH). Only the user themselves or a superuser may update it.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not allowed to access this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, requester, request))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthAccount(requester): AuthAccount,
    Path(user_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateUserRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account = accessible_account(&state, &requester, user_id).await?;

    let changes = AccountChanges {
        email: request.email,
        name: request.name,
        password: request.password,
    };
    if changes.is_empty() {
        debug!("No changes requested for user {}", user_id);
        return Ok(Json(ApiResponse::ok(UserResponse::from(account), "User updated successfully")));
    }

    let updated = state.accounts.update_account(user_id, changes).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(updated), "User updated successfully")))
}

/// Delete a user together with its token
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not allowed to access this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, requester))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthAccount(requester): AuthAccount,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    accessible_account(&state, &requester, user_id).await?;

    let token = state.tokens.token_for_account(user_id).await?;
    state.accounts.delete_account(user_id).await?;
    if let Some(token) = token {
        state.token_cache.invalidate(&token.key).await;
    }

    info!("User {} deleted by {}", user_id, requester.id);
    Ok(Json(ApiResponse::ok(
        format!("User {} deleted", user_id),
        "User deleted successfully",
    )))
}
