//! services/api/src/web/presentations.rs
//!
//! Handlers for whole-presentation operations.

use crate::web::{
    dto::{
        AddSlideRequest, ApplyThemeRequest, ApplyThemeResponse, GeneratePresentationRequest,
        PresentationDetailResponse, PresentationResponse, PresentationSettingsRequest,
        ReorderSlidesRequest, SlideResponse,
    },
    envelope::{ActionResult, ApiFailure},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use slidecraft_core::SlideColors;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Generate a new presentation from a topic.
///
/// If the model is unavailable or answers with something unusable, a four-slide
/// skeleton deck is stored instead.
#[utoipa::path(
    post,
    path = "/presentations/generate",
    request_body = GeneratePresentationRequest,
    responses(
        (status = 201, description = "Presentation created", body = PresentationDetailResponse),
        (status = 400, description = "Missing topic", body = ActionResult),
        (status = 404, description = "Unknown voice profile or framework", body = ActionResult),
        (status = 500, description = "Internal server error", body = ActionResult)
    )
)]
pub async fn generate_presentation_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GeneratePresentationRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    info!("Generating presentation for topic '{}'", payload.topic);
    let detail = app_state
        .deck
        .generate_presentation(payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Generate presentation", e))?;
    Ok((StatusCode::CREATED, Json(PresentationDetailResponse::from(detail))))
}

/// List all presentations, most recently updated first.
#[utoipa::path(
    get,
    path = "/presentations",
    responses(
        (status = 200, description = "All presentations", body = [PresentationResponse]),
        (status = 500, description = "Internal server error", body = ActionResult)
    )
)]
pub async fn list_presentations_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<PresentationResponse>>, ApiFailure> {
    let presentations = app_state
        .deck
        .list_presentations()
        .await
        .map_err(|e| ApiFailure::from_port("List presentations", e))?;
    Ok(Json(presentations.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 200, description = "The presentation with its slides", body = PresentationDetailResponse),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn get_presentation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
) -> Result<Json<PresentationDetailResponse>, ApiFailure> {
    let detail = app_state
        .deck
        .get_presentation(presentation_id)
        .await
        .map_err(|e| ApiFailure::from_port("Load presentation", e))?;
    Ok(Json(detail.into()))
}

/// Save the presentation settings panel.
#[utoipa::path(
    put,
    path = "/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = PresentationSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = PresentationResponse),
        (status = 400, description = "Invalid settings", body = ActionResult),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn update_presentation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
    Json(payload): Json<PresentationSettingsRequest>,
) -> Result<Json<PresentationResponse>, ApiFailure> {
    let presentation = app_state
        .deck
        .update_presentation_settings(presentation_id, payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Update presentation", e))?;
    Ok(Json(presentation.into()))
}

/// Delete a presentation and all of its slides.
#[utoipa::path(
    delete,
    path = "/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 200, description = "Deleted", body = ActionResult),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn delete_presentation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
) -> Result<Json<ActionResult>, ApiFailure> {
    app_state
        .deck
        .delete_presentation(presentation_id)
        .await
        .map_err(|e| ApiFailure::from_port("Delete presentation", e))?;
    Ok(ActionResult::ok())
}

/// Add a slide coloured by the presentation's theme.
#[utoipa::path(
    post,
    path = "/presentations/{id}/slides",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = AddSlideRequest,
    responses(
        (status = 201, description = "Slide created", body = SlideResponse),
        (status = 400, description = "Position below 1", body = ActionResult),
        (status = 404, description = "Presentation not found", body = ActionResult)
    )
)]
pub async fn add_slide_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
    Json(payload): Json<AddSlideRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let slide = app_state
        .deck
        .add_slide(presentation_id, payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Add slide", e))?;
    Ok((StatusCode::CREATED, Json(SlideResponse::from(slide))))
}

/// Write a new order for some or all slides in one transaction.
#[utoipa::path(
    put,
    path = "/presentations/{id}/slides/order",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = ReorderSlidesRequest,
    responses(
        (status = 200, description = "Reordered", body = ActionResult),
        (status = 400, description = "Order below 1 or colliding orders", body = ActionResult),
        (status = 404, description = "A slide is not part of the presentation", body = ActionResult)
    )
)]
pub async fn reorder_slides_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
    Json(payload): Json<ReorderSlidesRequest>,
) -> Result<Json<ActionResult>, ApiFailure> {
    app_state
        .deck
        .reorder_slides(presentation_id, payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Reorder slides", e))?;
    Ok(ActionResult::ok())
}

/// Give every slide the same background, text and heading colours.
#[utoipa::path(
    post,
    path = "/presentations/{id}/theme",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = ApplyThemeRequest,
    responses(
        (status = 200, description = "Colours applied", body = ApplyThemeResponse),
        (status = 400, description = "Unknown preset or incomplete colours", body = ActionResult),
        (status = 404, description = "Presentation not found", body = ActionResult)
    )
)]
pub async fn apply_theme_handler(
    State(app_state): State<Arc<AppState>>,
    Path(presentation_id): Path<Uuid>,
    Json(payload): Json<ApplyThemeRequest>,
) -> Result<Json<ApplyThemeResponse>, ApiFailure> {
    let colors = SlideColors::try_from(payload)?;
    let updated = app_state
        .deck
        .apply_theme_to_all(presentation_id, colors)
        .await
        .map_err(|e| ApiFailure::from_port("Apply theme", e))?;
    Ok(Json(ApplyThemeResponse {
        success: true,
        updated,
    }))
}
