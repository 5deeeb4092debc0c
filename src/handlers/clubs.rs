use crate::error::ApiError;
use crate::handlers::leagues::find_league;
use crate::handlers::players::PlayerResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use domain::{
    validators::{validate_name, MAX_NAME_LENGTH},
    DomainError,
};
use model::entities::{club, league, player};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ClubRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// League the club plays in
    pub league_id: i32,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateClubRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub league_id: Option<i32>,
}

/// Club with its league shown by name
#[derive(Debug, Serialize, ToSchema)]
pub struct ClubResponse {
    pub id: i32,
    pub name: String,
    pub league_id: i32,
    /// League name
    pub league: String,
}

impl ClubResponse {
    fn new(model: club::Model, league: &league::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            league_id: model.league_id,
            league: league.name.clone(),
        }
    }
}

/// Referenced league, reported as a bad request rather than a missing club.
async fn referenced_league(state: &AppState, league_id: i32) -> Result<league::Model, ApiError> {
    match find_league(state, league_id).await {
        Err(ApiError::Domain(DomainError::NotFound { .. })) => Err(DomainError::validation(
            format!("League with ID {} does not exist", league_id),
        )
        .into()),
        other => other,
    }
}

async fn find_club(state: &AppState, club_id: i32) -> Result<(club::Model, league::Model), ApiError> {
    let (found, parent) = club::Entity::find_by_id(club_id)
        .find_also_related(league::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("Club", club_id))?;
    let parent = parent.ok_or_else(|| DomainError::not_found("League", found.league_id))?;
    Ok((found, parent))
}

/// Create a club
#[utoipa::path(
    post,
    path = "/api/v1/clubs",
    tag = "clubs",
    request_body = ClubRequest,
    responses(
        (status = 201, description = "Club created successfully", body = ApiResponse<ClubResponse>),
        (status = 400, description = "Invalid request or unknown league", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_club(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ClubRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ClubResponse>>), ApiError> {
    validate_name("name", &request.name, MAX_NAME_LENGTH)?;
    let parent = referenced_league(&state, request.league_id).await?;

    let created = club::ActiveModel {
        name: Set(request.name),
        league_id: Set(parent.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Club created with ID: {} in league {}", created.id, parent.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ClubResponse::new(created, &parent), "Club created successfully")),
    ))
}

/// List all clubs
#[utoipa::path(
    get,
    path = "/api/v1/clubs",
    tag = "clubs",
    responses(
        (status = 200, description = "Clubs retrieved successfully", body = ApiResponse<Vec<ClubResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_clubs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClubResponse>>>, ApiError> {
    let clubs = club::Entity::find()
        .find_also_related(league::Entity)
        .order_by_asc(club::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} clubs", clubs.len());

    let data = clubs
        .into_iter()
        .filter_map(|(found, parent)| parent.map(|parent| ClubResponse::new(found, &parent)))
        .collect();
    Ok(Json(ApiResponse::ok(data, "Clubs retrieved successfully")))
}

/// Get a club by ID
#[utoipa::path(
    get,
    path = "/api/v1/clubs/{club_id}",
    tag = "clubs",
    params(
        ("club_id" = i32, Path, description = "Club ID")
    ),
    responses(
        (status = 200, description = "Club retrieved successfully", body = ApiResponse<ClubResponse>),
        (status = 404, description = "Club not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_club(
    State(state): State<AppState>,
    Path(club_id): Path<i32>,
) -> Result<Json<ApiResponse<ClubResponse>>, ApiError> {
    let (found, parent) = find_club(&state, club_id).await?;
    Ok(Json(ApiResponse::ok(ClubResponse::new(found, &parent), "Club retrieved successfully")))
}

/// List the squad of a club, ordered by jersey number
#[utoipa::path(
    get,
    path = "/api/v1/clubs/{club_id}/players",
    tag = "clubs",
    params(
        ("club_id" = i32, Path, description = "Club ID")
    ),
    responses(
        (status = 200, description = "Players retrieved successfully", body = ApiResponse<Vec<PlayerResponse>>),
        (status = 404, description = "Club not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_club_players(
    State(state): State<AppState>,
    Path(club_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<PlayerResponse>>>, ApiError> {
    let (found, _) = find_club(&state, club_id).await?;

    let squad = player::Entity::find()
        .filter(player::Column::ClubId.eq(found.id))
        .order_by_asc(player::Column::Number)
        .all(&state.db)
        .await?;
    debug!("Club {} has {} players", club_id, squad.len());

    let data = squad.into_iter().map(PlayerResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Players retrieved successfully")))
}

/// Update a club (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/api/v1/clubs/{club_id}",
    tag = "clubs",
    params(
        ("club_id" = i32, Path, description = "Club ID")
    ),
    request_body = UpdateClubRequest,
    responses(
        (status = 200, description = "Club updated successfully", body = ApiResponse<ClubResponse>),
        (status = 400, description = "Invalid request or unknown league", body = ErrorResponse),
        (status = 404, description = "Club not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_club(
    State(state): State<AppState>,
    Path(club_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateClubRequest>>,
) -> Result<Json<ApiResponse<ClubResponse>>, ApiError> {
    let (existing, current_league) = find_club(&state, club_id).await?;

    let name = request.name.unwrap_or_else(|| existing.name.clone());
    validate_name("name", &name, MAX_NAME_LENGTH)?;
    let parent = match request.league_id {
        Some(league_id) if league_id != current_league.id => {
            referenced_league(&state, league_id).await?
        }
        _ => current_league,
    };

    let mut active: club::ActiveModel = existing.into();
    active.name = Set(name);
    active.league_id = Set(parent.id);
    let updated = active.update(&state.db).await?;

    info!("Club with ID {} updated", club_id);
    Ok(Json(ApiResponse::ok(ClubResponse::new(updated, &parent), "Club updated successfully")))
}

/// Delete a club together with its players and matches
#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{club_id}",
    tag = "clubs",
    params(
        ("club_id" = i32, Path, description = "Club ID")
    ),
    responses(
        (status = 200, description = "Club deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Club not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_club(
    State(state): State<AppState>,
    Path(club_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let result = club::Entity::delete_by_id(club_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Club", club_id).into());
    }

    info!("Club with ID {} deleted", club_id);
    Ok(Json(ApiResponse::ok(
        format!("Club {} deleted", club_id),
        "Club deleted successfully",
    )))
}
