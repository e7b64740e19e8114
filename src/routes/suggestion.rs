use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{dto::suggestion_dto::SuggestSlotsPayload, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/api/positions/{id}/suggestions",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    request_body = SuggestSlotsPayload,
    responses(
        (status = 200, description = "Advisory slot proposals; nothing is persisted"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn suggest_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SuggestSlotsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let suggestions = state.suggestion_service.suggest_slots(id, payload).await?;
    Ok(Json(suggestions))
}
