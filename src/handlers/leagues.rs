use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use domain::{validators::validate_league_fields, DomainError};
use model::entities::league;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating or replacing a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LeagueRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// ISO 3166-1 alpha-2 country code, e.g. "GB"
    pub country: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateLeagueRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueResponse {
    pub id: i32,
    pub name: String,
    pub country: String,
}

impl From<league::Model> for LeagueResponse {
    fn from(model: league::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
        }
    }
}

pub(crate) async fn find_league(state: &AppState, league_id: i32) -> Result<league::Model, ApiError> {
    league::Entity::find_by_id(league_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("League", league_id).into())
}

/// Create a league
#[utoipa::path(
    post,
    path = "/api/v1/leagues",
    tag = "leagues",
    request_body = LeagueRequest,
    responses(
        (status = 201, description = "League created successfully", body = ApiResponse<LeagueResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_league(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LeagueRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeagueResponse>>), ApiError> {
    let country = validate_league_fields(&request.name, &request.country)?;

    let created = league::ActiveModel {
        name: Set(request.name),
        country: Set(country),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("League created with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LeagueResponse::from(created), "League created successfully")),
    ))
}

/// List all leagues
#[utoipa::path(
    get,
    path = "/api/v1/leagues",
    tag = "leagues",
    responses(
        (status = 200, description = "Leagues retrieved successfully", body = ApiResponse<Vec<LeagueResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_leagues(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeagueResponse>>>, ApiError> {
    let leagues = league::Entity::find()
        .order_by_asc(league::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} leagues", leagues.len());

    let data = leagues.into_iter().map(LeagueResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Leagues retrieved successfully")))
}

/// Get a league by ID
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID")
    ),
    responses(
        (status = 200, description = "League retrieved successfully", body = ApiResponse<LeagueResponse>),
        (status = 404, description = "League not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_league(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    let found = find_league(&state, league_id).await?;
    Ok(Json(ApiResponse::ok(LeagueResponse::from(found), "League retrieved successfully")))
}

/// Update a league (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID")
    ),
    request_body = UpdateLeagueRequest,
    responses(
        (status = 200, description = "League updated successfully", body = ApiResponse<LeagueResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_league(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateLeagueRequest>>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    let existing = find_league(&state, league_id).await?;

    let name = request.name.unwrap_or_else(|| existing.name.clone());
    let country = request.country.unwrap_or_else(|| existing.country.clone());
    let country = validate_league_fields(&name, &country)?;

    let mut active: league::ActiveModel = existing.into();
    active.name = Set(name);
    active.country = Set(country);
    let updated = active.update(&state.db).await?;

    info!("League with ID {} updated", league_id);
    Ok(Json(ApiResponse::ok(LeagueResponse::from(updated), "League updated successfully")))
}

/// Delete a league. Its clubs and their players are removed with it.
#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID")
    ),
    responses(
        (status = 200, description = "League deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "League not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_league(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let result = league::Entity::delete_by_id(league_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("League", league_id).into());
    }

    info!("League with ID {} deleted", league_id);
    Ok(Json(ApiResponse::ok(
        format!("League {} deleted", league_id),
        "League deleted successfully",
    )))
}
