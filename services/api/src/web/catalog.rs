//! services/api/src/web/catalog.rs
//!
//! Handlers for the generation inputs: frameworks, voice profiles and ideas,
//! plus the idea → angle → presentation flow.

use crate::web::{
    dto::{
        AngleDto, CreateFrameworkRequest, CreateFromAngleRequest, CreateIdeaRequest,
        FrameworkResponse, IdeaResponse, PresentationDetailResponse, VoiceProfileRequest,
        VoiceProfileResponse,
    },
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

//=========================================================================================
// Frameworks
//=========================================================================================

#[utoipa::path(
    get,
    path = "/frameworks",
    responses((status = 200, description = "All frameworks, default first", body = [FrameworkResponse]))
)]
pub async fn list_frameworks_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<FrameworkResponse>>, ApiFailure> {
    let frameworks = app_state
        .deck
        .list_frameworks()
        .await
        .map_err(|e| ApiFailure::from_port("List frameworks", e))?;
    Ok(Json(frameworks.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/frameworks",
    request_body = CreateFrameworkRequest,
    responses(
        (status = 201, description = "Framework created", body = FrameworkResponse),
        (status = 400, description = "Missing name", body = ActionResult)
    )
)]
pub async fn create_framework_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateFrameworkRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let framework = app_state
        .deck
        .create_framework(payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Create framework", e))?;
    Ok((StatusCode::CREATED, Json(FrameworkResponse::from(framework))))
}

#[utoipa::path(
    get,
    path = "/frameworks/{id}",
    params(("id" = Uuid, Path, description = "Framework id")),
    responses(
        (status = 200, description = "The framework with its slide templates", body = FrameworkResponse),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn get_framework_handler(
    State(app_state): State<Arc<AppState>>,
    Path(framework_id): Path<Uuid>,
) -> Result<Json<FrameworkResponse>, ApiFailure> {
    let framework = app_state
        .deck
        .get_framework(framework_id)
        .await
        .map_err(|e| ApiFailure::from_port("Load framework", e))?;
    Ok(Json(framework.into()))
}

//=========================================================================================
// Voice Profiles
//=========================================================================================

#[utoipa::path(
    get,
    path = "/voice-profiles",
    responses((status = 200, description = "All voice profiles, default first", body = [VoiceProfileResponse]))
)]
pub async fn list_voice_profiles_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<VoiceProfileResponse>>, ApiFailure> {
    let profiles = app_state
        .deck
        .list_voice_profiles()
        .await
        .map_err(|e| ApiFailure::from_port("List voice profiles", e))?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/voice-profiles",
    request_body = VoiceProfileRequest,
    responses(
        (status = 201, description = "Voice profile created", body = VoiceProfileResponse),
        (status = 400, description = "Missing name", body = ActionResult)
    )
)]
pub async fn create_voice_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<VoiceProfileRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let profile = app_state
        .deck
        .create_voice_profile(payload.into())
        .await
        .map_err(|e| ApiFailure::from_port("Create voice profile", e))?;
    Ok((StatusCode::CREATED, Json(VoiceProfileResponse::from(profile))))
}

#[utoipa::path(
    get,
    path = "/voice-profiles/{id}",
    params(("id" = Uuid, Path, description = "Voice profile id")),
    responses(
        (status = 200, description = "The voice profile", body = VoiceProfileResponse),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn get_voice_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<VoiceProfileResponse>, ApiFailure> {
    let profile = app_state
        .deck
        .get_voice_profile(profile_id)
        .await
        .map_err(|e| ApiFailure::from_port("Load voice profile", e))?;
    Ok(Json(profile.into()))
}

//=========================================================================================
// Ideas and Angles
//=========================================================================================

#[utoipa::path(
    get,
    path = "/ideas",
    responses((status = 200, description = "All ideas, newest first", body = [IdeaResponse]))
)]
pub async fn list_ideas_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<IdeaResponse>>, ApiFailure> {
    let ideas = app_state
        .deck
        .list_ideas()
        .await
        .map_err(|e| ApiFailure::from_port("List ideas", e))?;
    Ok(Json(ideas.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/ideas",
    request_body = CreateIdeaRequest,
    responses(
        (status = 201, description = "Idea created", body = IdeaResponse),
        (status = 400, description = "Missing title", body = ActionResult)
    )
)]
pub async fn create_idea_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateIdeaRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let idea = app_state
        .deck
        .create_idea(&payload.title, &payload.description)
        .await
        .map_err(|e| ApiFailure::from_port("Create idea", e))?;
    Ok((StatusCode::CREATED, Json(IdeaResponse::from(idea))))
}

#[utoipa::path(
    get,
    path = "/ideas/{id}",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "The idea", body = IdeaResponse),
        (status = 404, description = "Not found", body = ActionResult)
    )
)]
pub async fn get_idea_handler(
    State(app_state): State<Arc<AppState>>,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaResponse>, ApiFailure> {
    let idea = app_state
        .deck
        .get_idea(idea_id)
        .await
        .map_err(|e| ApiFailure::from_port("Load idea", e))?;
    Ok(Json(idea.into()))
}

/// Propose one angle per rhetorical framework (CUB, PASE, HEAR, WWH).
#[utoipa::path(
    post,
    path = "/ideas/{id}/angles",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Exactly four angles", body = [AngleDto]),
        (status = 404, description = "Idea not found", body = ActionResult)
    )
)]
pub async fn generate_angles_handler(
    State(app_state): State<Arc<AppState>>,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Vec<AngleDto>>, ApiFailure> {
    let angles = app_state
        .deck
        .generate_angles(idea_id)
        .await
        .map_err(|e| ApiFailure::from_port("Generate angles", e))?;
    Ok(Json(angles.into_iter().map(Into::into).collect()))
}

/// Expand a chosen angle into a full narrated presentation.
#[utoipa::path(
    post,
    path = "/ideas/{id}/presentations",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = CreateFromAngleRequest,
    responses(
        (status = 201, description = "Presentation created", body = PresentationDetailResponse),
        (status = 404, description = "Idea or voice profile not found", body = ActionResult)
    )
)]
pub async fn create_from_angle_handler(
    State(app_state): State<Arc<AppState>>,
    Path(idea_id): Path<Uuid>,
    Json(payload): Json<CreateFromAngleRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let detail = app_state
        .deck
        .create_presentation_from_angle(idea_id, payload.angle.into(), payload.voice_profile_id)
        .await
        .map_err(|e| ApiFailure::from_port("Create presentation from angle", e))?;
    Ok((StatusCode::CREATED, Json(PresentationDetailResponse::from(detail))))
}
