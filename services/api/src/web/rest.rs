//! services/api/src/web/rest.rs
//!
//! The REST route table and the master definition for the OpenAPI specification.

use crate::web::{
    catalog::*, dto::*, envelope::ActionResult, events::*, presentations::*, slides::*,
    state::AppState, themes::*,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_themes_handler,
        resolve_theme_handler,
        generate_presentation_handler,
        list_presentations_handler,
        get_presentation_handler,
        update_presentation_handler,
        delete_presentation_handler,
        add_slide_handler,
        reorder_slides_handler,
        apply_theme_handler,
        update_slide_handler,
        delete_slide_handler,
        duplicate_slide_handler,
        regenerate_slide_handler,
        list_frameworks_handler,
        create_framework_handler,
        get_framework_handler,
        list_voice_profiles_handler,
        create_voice_profile_handler,
        get_voice_profile_handler,
        list_ideas_handler,
        create_idea_handler,
        get_idea_handler,
        generate_angles_handler,
        create_from_angle_handler,
        events_handler,
    ),
    components(
        schemas(
            ActionResult,
            Invalidation,
            PresentationResponse,
            PresentationDetailResponse,
            GeneratePresentationRequest,
            PresentationSettingsRequest,
            SlideResponse,
            AddSlideRequest,
            SlideUpdateRequest,
            SlideOrderEntry,
            ReorderSlidesRequest,
            ApplyThemeRequest,
            ApplyThemeResponse,
            RegenerateSlideRequest,
            ThemePresetResponse,
            ResolveThemeRequest,
            ResolveThemeResponse,
            FrameworkResponse,
            FrameworkSlideResponse,
            CreateFrameworkRequest,
            FrameworkSlideRequest,
            VoiceProfileRequest,
            VoiceProfileResponse,
            CreateIdeaRequest,
            IdeaResponse,
            AngleDto,
            CreateFromAngleRequest,
        )
    ),
    tags(
        (name = "SlideCraft API", description = "Presentation generation and slide editing.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Every REST route, bound to the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/themes", get(list_themes_handler))
        .route("/themes/resolve", post(resolve_theme_handler))
        .route("/presentations", get(list_presentations_handler))
        .route("/presentations/generate", post(generate_presentation_handler))
        .route(
            "/presentations/{id}",
            get(get_presentation_handler)
                .put(update_presentation_handler)
                .delete(delete_presentation_handler),
        )
        .route("/presentations/{id}/slides", post(add_slide_handler))
        .route("/presentations/{id}/slides/order", put(reorder_slides_handler))
        .route("/presentations/{id}/theme", post(apply_theme_handler))
        .route(
            "/slides/{id}",
            put(update_slide_handler).delete(delete_slide_handler),
        )
        .route("/slides/{id}/duplicate", post(duplicate_slide_handler))
        .route("/slides/{id}/regenerate", post(regenerate_slide_handler))
        .route(
            "/frameworks",
            get(list_frameworks_handler).post(create_framework_handler),
        )
        .route("/frameworks/{id}", get(get_framework_handler))
        .route(
            "/voice-profiles",
            get(list_voice_profiles_handler).post(create_voice_profile_handler),
        )
        .route("/voice-profiles/{id}", get(get_voice_profile_handler))
        .route("/ideas", get(list_ideas_handler).post(create_idea_handler))
        .route("/ideas/{id}", get(get_idea_handler))
        .route("/ideas/{id}/angles", post(generate_angles_handler))
        .route("/ideas/{id}/presentations", post(create_from_angle_handler))
        .route("/events", get(events_handler))
        .with_state(app_state)
}
