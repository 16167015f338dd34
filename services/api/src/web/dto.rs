//! services/api/src/web/dto.rs
//!
//! Request and response payloads for the REST API, and their conversions to and
//! from the core domain types. Field names are camelCase on the wire.

use crate::web::envelope::ApiFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slidecraft_core::theme::{find_preset, ThemePreset};
use slidecraft_core::{
    AddSlide, Angle, Framework, FrameworkSlide, GeneratePresentation, Idea, NewFramework,
    NewFrameworkSlide, Presentation, PresentationDetail, PresentationSettings,
    RhetoricalFramework, Slide, SlideColors, SlideDraft, SlideLayout, SlideOrder, SlideType,
    SlideUpdate, TextAlign, VoiceProfile,
};
use utoipa::ToSchema;
use uuid::Uuid;

fn default_true() -> bool {
    true
}

//=========================================================================================
// Presentations
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub prompt: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub voice_profile_id: Option<Uuid>,
    pub framework_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Presentation> for PresentationResponse {
    fn from(p: Presentation) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            prompt: p.prompt,
            primary_color: p.primary_color,
            secondary_color: p.secondary_color,
            font_family: p.font_family,
            voice_profile_id: p.voice_profile_id,
            framework_id: p.framework_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// A presentation with its slides in ascending order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDetailResponse {
    #[serde(flatten)]
    pub presentation: PresentationResponse,
    pub slides: Vec<SlideResponse>,
}

impl From<PresentationDetail> for PresentationDetailResponse {
    fn from(detail: PresentationDetail) -> Self {
        Self {
            presentation: detail.presentation.into(),
            slides: detail.slides.into_iter().map(SlideResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePresentationRequest {
    pub topic: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub voice_profile_id: Option<Uuid>,
    pub framework_id: Option<Uuid>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_family: Option<String>,
}

impl From<GeneratePresentationRequest> for GeneratePresentation {
    fn from(r: GeneratePresentationRequest) -> Self {
        Self {
            topic: r.topic,
            title: r.title,
            description: r.description,
            voice_profile_id: r.voice_profile_id,
            framework_id: r.framework_id,
            primary_color: r.primary_color,
            secondary_color: r.secondary_color,
            font_family: r.font_family,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSettingsRequest {
    pub title: String,
    pub description: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

impl From<PresentationSettingsRequest> for PresentationSettings {
    fn from(r: PresentationSettingsRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            primary_color: r.primary_color,
            secondary_color: r.secondary_color,
            font_family: r.font_family,
        }
    }
}

//=========================================================================================
// Slides
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideResponse {
    pub id: Uuid,
    pub presentation_id: Uuid,
    pub order: i32,
    pub title: String,
    pub content: String,
    pub narration: Option<String>,
    /// Serialized annotation document.
    pub annotations: Option<String>,
    #[schema(value_type = String, example = "CONTENT")]
    pub slide_type: SlideType,
    #[schema(value_type = String, example = "BULLET_LIST")]
    pub layout: SlideLayout,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub heading_color: Option<String>,
    #[schema(value_type = String, example = "LEFT")]
    pub text_align: TextAlign,
    pub show_title: bool,
    pub show_content: bool,
}

impl From<Slide> for SlideResponse {
    fn from(s: Slide) -> Self {
        Self {
            id: s.id,
            presentation_id: s.presentation_id,
            order: s.order,
            title: s.title,
            content: s.content,
            narration: s.narration,
            annotations: s.annotations,
            slide_type: s.slide_type,
            layout: s.layout,
            image_url: s.image_url,
            background_color: s.background_color,
            text_color: s.text_color,
            heading_color: s.heading_color,
            text_align: s.text_align,
            show_title: s.show_title,
            show_content: s.show_content,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSlideRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[schema(value_type = Option<String>)]
    pub slide_type: Option<SlideType>,
    #[schema(value_type = Option<String>)]
    pub layout: Option<SlideLayout>,
    /// 1-based position; the slide is appended when omitted.
    pub position: Option<i32>,
}

impl From<AddSlideRequest> for AddSlide {
    fn from(r: AddSlideRequest) -> Self {
        Self {
            title: r.title,
            content: r.content,
            slide_type: r.slide_type,
            layout: r.layout,
            position: r.position,
        }
    }
}

/// The full editable field set of a slide. Every field is written.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideUpdateRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub narration: Option<String>,
    pub annotations: Option<String>,
    #[schema(value_type = String)]
    pub slide_type: SlideType,
    #[schema(value_type = String)]
    pub layout: SlideLayout,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub heading_color: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub text_align: TextAlign,
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default = "default_true")]
    pub show_content: bool,
}

impl From<SlideUpdateRequest> for SlideUpdate {
    fn from(r: SlideUpdateRequest) -> Self {
        SlideUpdate(SlideDraft {
            title: r.title,
            content: r.content,
            narration: r.narration,
            annotations: r.annotations,
            slide_type: r.slide_type,
            layout: r.layout,
            image_url: r.image_url,
            background_color: r.background_color,
            text_color: r.text_color,
            heading_color: r.heading_color,
            text_align: r.text_align,
            show_title: r.show_title,
            show_content: r.show_content,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideOrderEntry {
    pub id: Uuid,
    pub order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderSlidesRequest {
    pub slides: Vec<SlideOrderEntry>,
}

impl From<ReorderSlidesRequest> for Vec<SlideOrder> {
    fn from(r: ReorderSlidesRequest) -> Self {
        r.slides
            .into_iter()
            .map(|entry| SlideOrder {
                slide_id: entry.id,
                order: entry.order,
            })
            .collect()
    }
}

/// Either a preset name or all three colours.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyThemeRequest {
    pub preset: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub heading_color: Option<String>,
}

impl TryFrom<ApplyThemeRequest> for SlideColors {
    type Error = ApiFailure;

    fn try_from(r: ApplyThemeRequest) -> Result<Self, Self::Error> {
        if let Some(name) = r.preset.as_deref() {
            return find_preset(name)
                .map(ThemePreset::colors)
                .ok_or_else(|| ApiFailure::bad_request(format!("Unknown theme preset '{}'", name)));
        }
        match (r.background_color, r.text_color, r.heading_color) {
            (Some(background_color), Some(text_color), Some(heading_color)) => Ok(SlideColors {
                background_color,
                text_color,
                heading_color,
            }),
            _ => Err(ApiFailure::bad_request(
                "Provide a preset or backgroundColor, textColor and headingColor",
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplyThemeResponse {
    pub success: bool,
    pub updated: u64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateSlideRequest {
    pub additional_context: Option<String>,
    pub voice_profile_id: Option<Uuid>,
}

//=========================================================================================
// Themes
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemePresetResponse {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_color: String,
}

impl From<&ThemePreset> for ThemePresetResponse {
    fn from(p: &ThemePreset) -> Self {
        Self {
            name: p.name.to_string(),
            primary_color: p.primary_color.to_string(),
            secondary_color: p.secondary_color.to_string(),
            background_color: p.background_color.to_string(),
            text_color: p.text_color.to_string(),
            heading_color: p.heading_color.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveThemeRequest {
    pub primary_color: String,
    pub secondary_color: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveThemeResponse {
    /// False when the pair matched no preset and the light theme applies.
    pub matched: bool,
    pub theme: ThemePresetResponse,
}

//=========================================================================================
// Catalog
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSlideResponse {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    #[schema(value_type = String)]
    pub slide_type: SlideType,
    #[schema(value_type = String)]
    pub layout: SlideLayout,
    pub order: i32,
}

impl From<FrameworkSlide> for FrameworkSlideResponse {
    fn from(s: FrameworkSlide) -> Self {
        Self {
            id: s.id,
            title: s.title,
            instructions: s.instructions,
            slide_type: s.slide_type,
            layout: s.layout,
            order: s.order,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub slides: Vec<FrameworkSlideResponse>,
}

impl From<Framework> for FrameworkResponse {
    fn from(f: Framework) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            is_default: f.is_default,
            slides: f.slides.into_iter().map(FrameworkSlideResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSlideRequest {
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[schema(value_type = String)]
    pub slide_type: SlideType,
    /// Defaults to the slide type's usual layout.
    #[schema(value_type = Option<String>)]
    pub layout: Option<SlideLayout>,
}

/// Slides are stored in the order given.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFrameworkRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub slides: Vec<FrameworkSlideRequest>,
}

impl From<CreateFrameworkRequest> for NewFramework {
    fn from(r: CreateFrameworkRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            is_default: r.is_default,
            slides: r
                .slides
                .into_iter()
                .map(|s| NewFrameworkSlide {
                    title: s.title,
                    instructions: s.instructions,
                    layout: s.layout.unwrap_or_else(|| s.slide_type.default_layout()),
                    slide_type: s.slide_type,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceProfileRequest {
    pub name: String,
    pub is_default: bool,
    pub tone: Vec<String>,
    pub audience: Vec<String>,
    pub objective: Vec<String>,
    pub brand_voice: Vec<String>,
    pub content_style: Vec<String>,
    pub restrictions: Vec<String>,
    pub other: Vec<String>,
}

impl From<VoiceProfileRequest> for VoiceProfile {
    fn from(r: VoiceProfileRequest) -> Self {
        Self {
            id: Uuid::nil(),
            name: r.name,
            is_default: r.is_default,
            tone: r.tone,
            audience: r.audience,
            objective: r.objective,
            brand_voice: r.brand_voice,
            content_style: r.content_style,
            restrictions: r.restrictions,
            other: r.other,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub tone: Vec<String>,
    pub audience: Vec<String>,
    pub objective: Vec<String>,
    pub brand_voice: Vec<String>,
    pub content_style: Vec<String>,
    pub restrictions: Vec<String>,
    pub other: Vec<String>,
}

impl From<VoiceProfile> for VoiceProfileResponse {
    fn from(p: VoiceProfile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            is_default: p.is_default,
            tone: p.tone,
            audience: p.audience,
            objective: p.objective,
            brand_voice: p.brand_voice,
            content_style: p.content_style,
            restrictions: p.restrictions,
            other: p.other,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIdeaRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Idea> for IdeaResponse {
    fn from(i: Idea) -> Self {
        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            created_at: i.created_at,
        }
    }
}

/// A candidate framing of an idea. Sent back unchanged to expand it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AngleDto {
    #[schema(value_type = String, example = "PASE")]
    pub framework: RhetoricalFramework,
    pub framework_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl From<Angle> for AngleDto {
    fn from(a: Angle) -> Self {
        Self {
            framework: a.framework,
            framework_id: a.framework_id,
            title: a.title,
            description: a.description,
            key_points: a.key_points,
        }
    }
}

impl From<AngleDto> for Angle {
    fn from(a: AngleDto) -> Self {
        Self {
            framework: a.framework,
            framework_id: a.framework_id,
            title: a.title,
            description: a.description,
            key_points: a.key_points,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFromAngleRequest {
    pub angle: AngleDto,
    pub voice_profile_id: Option<Uuid>,
}
