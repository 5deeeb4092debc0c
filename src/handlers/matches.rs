use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use domain::{
    matches::{self, MatchChanges, MatchInput},
    DomainError,
};
use model::entities::football_match;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct MatchRequest {
    pub home_team_id: i32,
    pub away_team_id: i32,
    /// Match day (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Free-form score, e.g. "2:1". Empty until played.
    #[validate(length(max = 50))]
    #[serde(default)]
    pub result: String,
}

impl From<MatchRequest> for MatchInput {
    fn from(request: MatchRequest) -> Self {
        Self {
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            date: request.date,
            result: request.result,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateMatchRequest {
    pub home_team_id: Option<i32>,
    pub away_team_id: Option<i32>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    pub result: Option<String>,
}

impl From<UpdateMatchRequest> for MatchChanges {
    fn from(request: UpdateMatchRequest) -> Self {
        Self {
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            date: request.date,
            result: request.result,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResponse {
    pub id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: NaiveDate,
    pub result: String,
}

impl From<football_match::Model> for MatchResponse {
    fn from(model: football_match::Model) -> Self {
        Self {
            id: model.id,
            home_team_id: model.home_team_id,
            away_team_id: model.away_team_id,
            date: model.date,
            result: model.result,
        }
    }
}

/// Schedule or record a match
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    tag = "matches",
    request_body = MatchRequest,
    responses(
        (status = 201, description = "Match created successfully", body = ApiResponse<MatchResponse>),
        (status = 400, description = "Invalid request or a team playing itself", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_match(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<MatchRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponse>>), ApiError> {
    let created = matches::create_match(&state.db, request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MatchResponse::from(created), "Match created successfully")),
    ))
}

/// List all matches, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    tag = "matches",
    responses(
        (status = 200, description = "Matches retrieved successfully", body = ApiResponse<Vec<MatchResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_matches(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchResponse>>>, ApiError> {
    let found = football_match::Entity::find()
        .order_by_desc(football_match::Column::Date)
        .order_by_asc(football_match::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} matches", found.len());

    let data = found.into_iter().map(MatchResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Matches retrieved successfully")))
}

/// Get a match by ID
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match retrieved successfully", body = ApiResponse<MatchResponse>),
        (status = 404, description = "Match not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i32>,
) -> Result<Json<ApiResponse<MatchResponse>>, ApiError> {
    let found = football_match::Entity::find_by_id(match_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("Match", match_id))?;

    Ok(Json(ApiResponse::ok(MatchResponse::from(found), "Match retrieved successfully")))
}

/// Update a match (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID")
    ),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Match updated successfully", body = ApiResponse<MatchResponse>),
        (status = 400, description = "Invalid request or a team playing itself", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_match(
    State(state): State<AppState>,
    Path(match_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateMatchRequest>>,
) -> Result<Json<ApiResponse<MatchResponse>>, ApiError> {
    let updated = matches::update_match(&state.db, match_id, request.into()).await?;
    Ok(Json(ApiResponse::ok(MatchResponse::from(updated), "Match updated successfully")))
}

/// Delete a match
#[utoipa::path(
    delete,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Match not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_match(
    State(state): State<AppState>,
    Path(match_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let result = football_match::Entity::delete_by_id(match_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Match", match_id).into());
    }

    info!("Match with ID {} deleted", match_id);
    Ok(Json(ApiResponse::ok(
        format!("Match {} deleted", match_id),
        "Match deleted successfully",
    )))
}
