use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use domain::{
    players::{self, PlayerChanges, PlayerInput},
    DomainError,
};
use model::entities::player;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct PlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Jersey number, 0 to 100, unique within the club
    pub number: i32,
    pub age: i32,
    /// ISO 3166-1 alpha-2 country code
    pub nationality: String,
    pub position_id: Option<i32>,
    pub club_id: i32,
}

impl From<PlayerRequest> for PlayerInput {
    fn from(request: PlayerRequest) -> Self {
        Self {
            name: request.name,
            number: request.number,
            age: request.age,
            nationality: request.nationality,
            position_id: request.position_id,
            club_id: request.club_id,
        }
    }
}

/// Partial update of a player. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub number: Option<i32>,
    pub age: Option<i32>,
    pub nationality: Option<String>,
    /// Omit to keep the position, `null` to clear it
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub position_id: Option<Option<i32>>,
    pub club_id: Option<i32>,
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent field (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdatePlayerRequest> for PlayerChanges {
    fn from(request: UpdatePlayerRequest) -> Self {
        Self {
            name: request.name,
            number: request.number,
            age: request.age,
            nationality: request.nationality,
            position_id: request.position_id,
            club_id: request.club_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    pub id: i32,
    pub name: String,
    pub number: i32,
    pub age: i32,
    pub nationality: String,
    pub position_id: Option<i32>,
    pub club_id: i32,
}

impl From<player::Model> for PlayerResponse {
    fn from(model: player::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            number: model.number,
            age: model.age,
            nationality: model.nationality,
            position_id: model.position_id,
            club_id: model.club_id,
        }
    }
}

/// Create a player
#[utoipa::path(
    post,
    path = "/api/v1/players",
    tag = "players",
    request_body = PlayerRequest,
    responses(
        (status = 201, description = "Player created successfully", body = ApiResponse<PlayerResponse>),
        (status = 400, description = "Invalid request or jersey number already taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_player(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PlayerRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerResponse>>), ApiError> {
    let created = players::create_player(&state.db, request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PlayerResponse::from(created), "Player created successfully")),
    ))
}

/// List all players
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "players",
    responses(
        (status = 200, description = "Players retrieved successfully", body = ApiResponse<Vec<PlayerResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_players(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlayerResponse>>>, ApiError> {
    let found = player::Entity::find()
        .order_by_asc(player::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} players", found.len());

    let data = found.into_iter().map(PlayerResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Players retrieved successfully")))
}

/// Get a player by ID
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Player retrieved successfully", body = ApiResponse<PlayerResponse>),
        (status = 404, description = "Player not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let found = player::Entity::find_by_id(player_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("Player", player_id))?;

    Ok(Json(ApiResponse::ok(PlayerResponse::from(found), "Player retrieved successfully")))
}

/// Update a player (PUT or PATCH). The jersey number is re-checked on every update.
#[utoipa::path(
    put,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID")
    ),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Player updated successfully", body = ApiResponse<PlayerResponse>),
        (status = 400, description = "Invalid request or jersey number already taken", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdatePlayerRequest>>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let updated = players::update_player(&state.db, player_id, request.into()).await?;
    Ok(Json(ApiResponse::ok(PlayerResponse::from(updated), "Player updated successfully")))
}

/// Delete a player
#[utoipa::path(
    delete,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Player deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Player not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let result = player::Entity::delete_by_id(player_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Player", player_id).into());
    }

    info!("Player with ID {} deleted", player_id);
    Ok(Json(ApiResponse::ok(
        format!("Player {} deleted", player_id),
        "Player deleted successfully",
    )))
}
