use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{dto::schedule_dto::CreateSchedulePayload, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Interview round booked"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Interviewer double-booking or duplicate live round"),
        (status = 412, description = "Stage progression gate not met")
    )
)]
#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let schedule = state.schedule_service.create_schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    post,
    path = "/api/schedules/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule canceled"),
        (status = 404, description = "Schedule not found"),
        (status = 422, description = "Schedule already completed")
    )
)]
#[axum::debug_handler]
pub async fn cancel_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let schedule = state.schedule_service.cancel_schedule(id).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/schedules",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Round history ordered by stage then start time"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn schedule_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let history = state.schedule_service.schedule_history(id).await?;
    Ok(Json(history))
}
