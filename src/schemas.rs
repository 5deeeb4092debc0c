use domain::{AccountStore, TokenIssuer};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{
    auth::{TokenRequest, TokenResponse},
    clubs::{ClubRequest, ClubResponse, UpdateClubRequest},
    leagues::{LeagueRequest, LeagueResponse, UpdateLeagueRequest},
    matches::{MatchRequest, MatchResponse, UpdateMatchRequest},
    players::{PlayerRequest, PlayerResponse, UpdatePlayerRequest},
    positions::{PositionRequest, PositionResponse, UpdatePositionRequest},
    users::{CreateUserRequest, UpdateUserRequest, UserResponse},
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Account lifecycle operations
    pub accounts: AccountStore,
    /// Credential exchange and token lookup
    pub tokens: TokenIssuer,
    /// Token key -> account ID, saves a token table lookup per request
    pub token_cache: Cache<String, i32>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, token_cache: Cache<String, i32>) -> Self {
        Self {
            accounts: AccountStore::new(db.clone()),
            tokens: TokenIssuer::with_store(db.clone()),
            db,
            token_cache,
        }
    }
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::auth::create_token,
        crate::handlers::auth::revoke_token,
        crate::handlers::leagues::create_league,
        crate::handlers::leagues::get_leagues,
        crate::handlers::leagues::get_league,
        crate::handlers::leagues::update_league,
        crate::handlers::leagues::delete_league,
        crate::handlers::clubs::create_club,
        crate::handlers::clubs::get_clubs,
        crate::handlers::clubs::get_club,
        crate::handlers::clubs::get_club_players,
        crate::handlers::clubs::update_club,
        crate::handlers::clubs::delete_club,
        crate::handlers::positions::create_position,
        crate::handlers::positions::get_positions,
        crate::handlers::positions::get_position,
        crate::handlers::positions::update_position,
        crate::handlers::positions::delete_position,
        crate::handlers::players::create_player,
        crate::handlers::players::get_players,
        crate::handlers::players::get_player,
        crate::handlers::players::update_player,
        crate::handlers::players::delete_player,
        crate::handlers::matches::create_match,
        crate::handlers::matches::get_matches,
        crate::handlers::matches::get_match,
        crate::handlers::matches::update_match,
        crate::handlers::matches::delete_match,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<TokenResponse>,
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            TokenRequest,
            TokenResponse,
            LeagueRequest,
            UpdateLeagueRequest,
            LeagueResponse,
            ClubRequest,
            UpdateClubRequest,
            ClubResponse,
            PositionRequest,
            UpdatePositionRequest,
            PositionResponse,
            PlayerRequest,
            UpdatePlayerRequest,
            PlayerResponse,
            MatchRequest,
            UpdateMatchRequest,
            MatchResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User account endpoints"),
        (name = "auth", description = "Token authentication endpoints"),
        (name = "leagues", description = "League endpoints"),
        (name = "clubs", description = "Club endpoints"),
        (name = "positions", description = "Playing position endpoints"),
        (name = "players", description = "Player endpoints"),
        (name = "matches", description = "Match endpoints"),
    ),
    info(
        title = "Football API",
        description = "Football league tracker API - leagues, clubs, players and matches with token-authenticated user accounts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
