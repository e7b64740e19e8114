use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::catalog_dto::{CreatePositionPayload, CreateStagePayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/catalog/positions",
    request_body = CreatePositionPayload,
    responses(
        (status = 201, description = "Position created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_position(
    State(state): State<AppState>,
    Json(payload): Json<CreatePositionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let position = state.catalog_service.create_position(payload).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/positions",
    responses(
        (status = 200, description = "All open positions")
    )
)]
#[axum::debug_handler]
pub async fn list_positions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let positions = state.catalog_service.list_positions().await?;
    Ok(Json(positions))
}

#[utoipa::path(
    get,
    path = "/api/catalog/positions/{id}",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position found"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let position = state.catalog_service.get_position(id).await?;
    Ok(Json(position))
}

#[utoipa::path(
    post,
    path = "/api/catalog/positions/{id}/stages",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    request_body = CreateStagePayload,
    responses(
        (status = 201, description = "Stage appended to the process"),
        (status = 400, description = "Invalid payload or non-contiguous order"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn create_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateStagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let stage = state.catalog_service.add_stage(id, payload).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/positions/{id}/stages",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Ordered stages with interviewer pools"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn list_stages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let stages = state.catalog_service.stages_for_position(id).await?;
    Ok(Json(stages))
}
