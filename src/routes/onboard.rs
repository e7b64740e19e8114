use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::onboard_dto::{ChangeOnboardStatusPayload, CreateOnboardPayload, UpdateOfferPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/onboard-requests",
    request_body = CreateOnboardPayload,
    responses(
        (status = 201, description = "Offer opened"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found"),
        (status = 412, description = "Final stage not passed or offer already pending")
    )
)]
#[axum::debug_handler]
pub async fn create_onboard_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateOnboardPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state.onboard_service.create_request(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/onboard-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Onboard request ID")
    ),
    responses(
        (status = 200, description = "Request with transition history"),
        (status = 404, description = "Request not found")
    )
)]
#[axum::debug_handler]
pub async fn get_onboard_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let response = state.onboard_service.get_request(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/api/onboard-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Onboard request ID")
    ),
    request_body = UpdateOfferPayload,
    responses(
        (status = 200, description = "Offer terms updated"),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Request already terminal")
    )
)]
#[axum::debug_handler]
pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let request = state.onboard_service.update_offer(id, payload).await?;
    Ok(Json(request))
}

#[utoipa::path(
    post,
    path = "/api/onboard-requests/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Onboard request ID")
    ),
    request_body = ChangeOnboardStatusPayload,
    responses(
        (status = 200, description = "Status changed, history appended"),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Request already terminal")
    )
)]
#[axum::debug_handler]
pub async fn change_onboard_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeOnboardStatusPayload>,
) -> Result<impl IntoResponse> {
    let response = state.onboard_service.change_status(id, payload).await?;
    Ok(Json(response))
}
