use crate::handlers::{
    auth::{create_token, revoke_token},
    clubs::{create_club, delete_club, get_club, get_club_players, get_clubs, update_club},
    health::health_check,
    leagues::{create_league, delete_league, get_league, get_leagues, update_league},
    matches::{create_match, delete_match, get_match, get_matches, update_match},
    players::{create_player, delete_player, get_player, get_players, update_player},
    positions::{create_position, delete_position, get_position, get_positions, update_position},
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    create_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

pub fn create_router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Accounts. Registration and listing are public, the rest needs a token.
        // Unlisted methods (POST on a single user) answer 405.
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/api/v1/auth/token", post(create_token).delete(revoke_token))
        // League data
        .route("/api/v1/leagues", post(create_league).get(get_leagues))
        .route(
            "/api/v1/leagues/:league_id",
            get(get_league)
                .put(update_league)
                .patch(update_league)
                .delete(delete_league),
        )
        .route("/api/v1/clubs", post(create_club).get(get_clubs))
        .route(
            "/api/v1/clubs/:club_id",
            get(get_club)
                .put(update_club)
                .patch(update_club)
                .delete(delete_club),
        )
        .route("/api/v1/clubs/:club_id/players", get(get_club_players))
        .route("/api/v1/positions", post(create_position).get(get_positions))
        .route(
            "/api/v1/positions/:position_id",
            get(get_position)
                .put(update_position)
                .patch(update_position)
                .delete(delete_position),
        )
        .route("/api/v1/players", post(create_player).get(get_players))
        .route(
            "/api/v1/players/:player_id",
            get(get_player)
                .put(update_player)
                .patch(update_player)
                .delete(delete_player),
        )
        .route("/api/v1/matches", post(create_match).get(get_matches))
        .route(
            "/api/v1/matches/:match_id",
            get(get_match)
                .put(update_match)
                .patch(update_match)
                .delete(delete_match),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
