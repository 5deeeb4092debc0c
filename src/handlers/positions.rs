use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use domain::{validators::validate_position_fields, DomainError};
use model::entities::position;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct PositionRequest {
    /// Abbreviation, e.g. "GK"
    #[validate(length(min = 1, max = 3))]
    pub short_name: String,
    /// Full name, e.g. "Goalkeeper"
    #[validate(length(min = 1, max = 100))]
    pub long_name: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePositionRequest {
    #[validate(length(min = 1, max = 3))]
    pub short_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub long_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionResponse {
    pub id: i32,
    pub short_name: String,
    pub long_name: String,
}

impl From<position::Model> for PositionResponse {
    fn from(model: position::Model) -> Self {
        Self {
            id: model.id,
            short_name: model.short_name,
            long_name: model.long_name,
        }
    }
}

async fn find_position(state: &AppState, position_id: i32) -> Result<position::Model, ApiError> {
    position::Entity::find_by_id(position_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("Position", position_id).into())
}

/// Create a playing position
#[utoipa::path(
    post,
    path = "/api/v1/positions",
    tag = "positions",
    request_body = PositionRequest,
    responses(
        (status = 201, description = "Position created successfully", body = ApiResponse<PositionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_position(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PositionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PositionResponse>>), ApiError> {
    validate_position_fields(&request.short_name, &request.long_name)?;

    let created = position::ActiveModel {
        short_name: Set(request.short_name),
        long_name: Set(request.long_name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Position {} created with ID: {}", created.short_name, created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PositionResponse::from(created), "Position created successfully")),
    ))
}

/// List all positions
#[utoipa::path(
    get,
    path = "/api/v1/positions",
    tag = "positions",
    responses(
        (status = 200, description = "Positions retrieved successfully", body = ApiResponse<Vec<PositionResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_positions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PositionResponse>>>, ApiError> {
    let positions = position::Entity::find()
        .order_by_asc(position::Column::Id)
        .all(&state.db)
        .await?;

    let data = positions.into_iter().map(PositionResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Positions retrieved successfully")))
}

/// Get a position by ID
#[utoipa::path(
    get,
    path = "/api/v1/positions/{position_id}",
    tag = "positions",
    params(
        ("position_id" = i32, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position retrieved successfully", body = ApiResponse<PositionResponse>),
        (status = 404, description = "Position not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_position(
    State(state): State<AppState>,
    Path(position_id): Path<i32>,
) -> Result<Json<ApiResponse<PositionResponse>>, ApiError> {
    let found = find_position(&state, position_id).await?;
    Ok(Json(ApiResponse::ok(PositionResponse::from(found), "Position retrieved successfully")))
}

/// Update a position (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/api/v1/positions/{position_id}",
    tag = "positions",
    params(
        ("position_id" = i32, Path, description = "Position ID")
    ),
    request_body = UpdatePositionRequest,
    responses(
        (status = 200, description = "Position updated successfully", body = ApiResponse<PositionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Position not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_position(
    State(state): State<AppState>,
    Path(position_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdatePositionRequest>>,
) -> Result<Json<ApiResponse<PositionResponse>>, ApiError> {
    let existing = find_position(&state, position_id).await?;

    let short_name = request.short_name.unwrap_or_else(|| existing.short_name.clone());
    let long_name = request.long_name.unwrap_or_else(|| existing.long_name.clone());
    validate_position_fields(&short_name, &long_name)?;

    let mut active: position::ActiveModel = existing.into();
    active.short_name = Set(short_name);
    active.long_name = Set(long_name);
    let updated = active.update(&state.db).await?;

    info!("Position with ID {} updated", position_id);
    Ok(Json(ApiResponse::ok(PositionResponse::from(updated), "Position updated successfully")))
}

/// Delete a position. Players keep their record with no position.
#[utoipa::path(
    delete,
    path = "/api/v1/positions/{position_id}",
    tag = "positions",
    params(
        ("position_id" = i32, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Position not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_position(
    State(state): State<AppState>,
    Path(position_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let result = position::Entity::delete_by_id(position_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Position", position_id).into());
    }

    info!("Position with ID {} deleted", position_id);
    Ok(Json(ApiResponse::ok(
        format!("Position {} deleted", position_id),
        "Position deleted successfully",
    )))
}
