//! services/api/src/web/themes.rs

use crate::web::dto::{ResolveThemeRequest, ResolveThemeResponse, ThemePresetResponse};
use axum::response::Json;
use slidecraft_core::theme::{resolve_theme_defaults, ResolvedTheme, THEME_PRESETS};

/// The preset table shown in the theme picker.
#[utoipa::path(
    get,
    path = "/themes",
    responses((status = 200, description = "Every theme preset", body = [ThemePresetResponse]))
)]
pub async fn list_themes_handler() -> Json<Vec<ThemePresetResponse>> {
    Json(THEME_PRESETS.iter().map(ThemePresetResponse::from).collect())
}

/// Resolve a brand colour pair to the theme new slides would inherit.
#[utoipa::path(
    post,
    path = "/themes/resolve",
    request_body = ResolveThemeRequest,
    responses((status = 200, description = "The matching preset, or light", body = ResolveThemeResponse))
)]
pub async fn resolve_theme_handler(
    Json(payload): Json<ResolveThemeRequest>,
) -> Json<ResolveThemeResponse> {
    let resolved = resolve_theme_defaults(&payload.primary_color, &payload.secondary_color);
    Json(ResolveThemeResponse {
        matched: matches!(resolved, ResolvedTheme::Preset(_)),
        theme: resolved.preset().into(),
    })
}
