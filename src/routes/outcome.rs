use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::outcome_dto::{EditFeedbackPayload, SetDecisionPayload, SubmitFeedbackPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/schedules/{id}/feedback",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = SubmitFeedbackPayload,
    responses(
        (status = 201, description = "Feedback recorded, schedule completed"),
        (status = 404, description = "Schedule not found"),
        (status = 409, description = "Feedback already submitted")
    )
)]
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitFeedbackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state.outcome_service.submit_feedback(id, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/outcomes/{id}",
    params(
        ("id" = Uuid, Path, description = "Outcome ID")
    ),
    responses(
        (status = 200, description = "Outcome found"),
        (status = 404, description = "Outcome not found")
    )
)]
#[axum::debug_handler]
pub async fn get_outcome(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let outcome = state.outcome_service.get_outcome(id).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    patch,
    path = "/api/outcomes/{id}/feedback",
    params(
        ("id" = Uuid, Path, description = "Outcome ID")
    ),
    request_body = EditFeedbackPayload,
    responses(
        (status = 200, description = "Feedback text updated"),
        (status = 404, description = "Outcome not found")
    )
)]
#[axum::debug_handler]
pub async fn edit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditFeedbackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state.outcome_service.edit_feedback(id, payload).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/outcomes/{id}/decision",
    params(
        ("id" = Uuid, Path, description = "Outcome ID")
    ),
    request_body = SetDecisionPayload,
    responses(
        (status = 200, description = "Decision set, candidate advanced or failed"),
        (status = 404, description = "Outcome not found"),
        (status = 422, description = "Decision already set")
    )
)]
#[axum::debug_handler]
pub async fn set_decision(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetDecisionPayload>,
) -> Result<impl IntoResponse> {
    let outcome = state
        .outcome_service
        .set_decision(id, payload.decision)
        .await?;
    Ok(Json(outcome))
}
