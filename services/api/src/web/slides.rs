//! services/api/src/web/slides.rs
//!
//! Handlers addressed by slide id.

use crate::web::{
    dto::{RegenerateSlideRequest, SlideResponse, SlideUpdateRequest},
    envelope::{ActionResult, ApiFailure},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use uuid::Uuid;

/// Save every editable field of a slide. The last write wins.
#[utoipa::path(
    put,
    path = "/slides/{id}",
    params(("id" = Uuid, Path, description = "Slide id")),
    request_body = SlideUpdateRequest,
    responses(
        (status = 200, description = "Saved", body = SlideResponse),
        (status = 400, description = "Malformed annotations", body = ActionResult),
        (status = 404, description = "Slide not found", body = ActionResult)
    )
)]
pub async fn update_slide_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slide_id): Path<Uuid>,
    Json(payload): Json<SlideUpdateRequest>,
) -> Result<Json<SlideResponse>, ApiFailure> {
    let slide = app_state
        .deck
        .update_slide(slide_id, payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Save slide", e))?;
    Ok(Json(slide.into()))
}

/// Delete a slide. The remaining slides keep their orders.
#[utoipa::path(
    delete,
    path = "/slides/{id}",
    params(("id" = Uuid, Path, description = "Slide id")),
    responses(
        (status = 200, description = "Deleted", body = ActionResult),
        (status = 404, description = "Slide not found", body = ActionResult)
    )
)]
pub async fn delete_slide_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slide_id): Path<Uuid>,
) -> Result<Json<ActionResult>, ApiFailure> {
    app_state
        .deck
        .delete_slide(slide_id)
        .await
        .map_err(|e| ApiFailure::from_port("Delete slide", e))?;
    Ok(ActionResult::ok())
}

/// Copy a slide into the position directly after it.
#[utoipa::path(
    post,
    path = "/slides/{id}/duplicate",
    params(("id" = Uuid, Path, description = "Slide id")),
    responses(
        (status = 201, description = "The copy", body = SlideResponse),
        (status = 404, description = "Slide not found", body = ActionResult)
    )
)]
pub async fn duplicate_slide_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slide_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiFailure> {
    let copy = app_state
        .deck
        .duplicate_slide(slide_id)
        .await
        .map_err(|e| ApiFailure::from_port("Duplicate slide", e))?;
    Ok((StatusCode::CREATED, Json(SlideResponse::from(copy))))
}

/// Rewrite a slide with the model.
///
/// When the model fails the slide keeps its content with a visible marker appended.
#[utoipa::path(
    post,
    path = "/slides/{id}/regenerate",
    params(("id" = Uuid, Path, description = "Slide id")),
    request_body = RegenerateSlideRequest,
    responses(
        (status = 200, description = "The regenerated slide", body = SlideResponse),
        (status = 404, description = "Slide or voice profile not found", body = ActionResult)
    )
)]
pub async fn regenerate_slide_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slide_id): Path<Uuid>,
    Json(payload): Json<RegenerateSlideRequest>,
) -> Result<Json<SlideResponse>, ApiFailure> {
    let slide = app_state
        .deck
        .regenerate_slide(slide_id, payload.additional_context, payload.voice_profile_id)
        .await
        .map_err(|e| ApiFailure::from_port("Regenerate slide", e))?;
    Ok(Json(slide.into()))
}
