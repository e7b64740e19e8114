use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{dto::candidate_dto::IntakeCandidatePayload, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = IntakeCandidatePayload,
    responses(
        (status = 201, description = "Candidate accepted into the pipeline"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn intake_candidate(
    State(state): State<AppState>,
    Json(payload): Json<IntakeCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.intake_candidate(payload).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_candidate(id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    get,
    path = "/api/positions/{id}/candidates",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Candidates annotated with their current stage"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates_for_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.candidates_for_position(id).await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate rejected"),
        (status = 404, description = "Candidate not found"),
        (status = 422, description = "Candidate already terminal")
    )
)]
#[axum::debug_handler]
pub async fn reject_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.reject_candidate(id).await?;
    Ok(Json(candidate))
}
