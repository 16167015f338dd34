//! crates/slidecraft_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Framework, Idea, NewFramework, NewPresentation, Presentation, PresentationSettings, Slide,
    SlideColors, SlideDraft, SlideOrder, SlideUpdate, VoiceProfile,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The relational store that owns every entity.
///
/// Each mutating method is atomic: either all of its writes land or none do.
#[async_trait]
pub trait PresentationStore: Send + Sync {
    // --- Presentations ---
    /// Creates a presentation and its initial slides, numbered `1..=N` in the given order.
    async fn create_presentation(
        &self,
        presentation: NewPresentation,
        slides: Vec<SlideDraft>,
    ) -> PortResult<Presentation>;

    async fn get_presentation(&self, presentation_id: Uuid) -> PortResult<Presentation>;

    async fn list_presentations(&self) -> PortResult<Vec<Presentation>>;

    async fn update_presentation_settings(
        &self,
        presentation_id: Uuid,
        settings: PresentationSettings,
    ) -> PortResult<Presentation>;

    /// Deletes a presentation together with all of its slides.
    async fn delete_presentation(&self, presentation_id: Uuid) -> PortResult<()>;

    // --- Slides ---
    /// Returns the presentation's slides in ascending `order`.
    async fn list_slides(&self, presentation_id: Uuid) -> PortResult<Vec<Slide>>;

    async fn get_slide(&self, slide_id: Uuid) -> PortResult<Slide>;

    /// Shifts every slide at or after `position` up by one, then writes `draft` at `position`.
    async fn insert_slide_at(
        &self,
        presentation_id: Uuid,
        position: i32,
        draft: SlideDraft,
    ) -> PortResult<Slide>;

    /// Removes a slide without renumbering the rest.
    async fn delete_slide(&self, slide_id: Uuid) -> PortResult<()>;

    async fn reorder_slides(&self, presentation_id: Uuid, orders: Vec<SlideOrder>) -> PortResult<()>;

    async fn update_slide(&self, slide_id: Uuid, update: SlideUpdate) -> PortResult<Slide>;

    /// Sets the same three colours on every slide of a presentation.
    /// Returns the number of slides written.
    async fn apply_colors_to_all(
        &self,
        presentation_id: Uuid,
        colors: SlideColors,
    ) -> PortResult<u64>;

    // --- Frameworks ---
    async fn create_framework(&self, framework: NewFramework) -> PortResult<Framework>;

    async fn get_framework(&self, framework_id: Uuid) -> PortResult<Framework>;

    async fn list_frameworks(&self) -> PortResult<Vec<Framework>>;

    // --- Voice Profiles ---
    /// Stores the profile; its `id` is assigned by the store.
    async fn create_voice_profile(&self, profile: VoiceProfile) -> PortResult<VoiceProfile>;

    async fn get_voice_profile(&self, profile_id: Uuid) -> PortResult<VoiceProfile>;

    async fn list_voice_profiles(&self) -> PortResult<Vec<VoiceProfile>>;

    // --- Ideas ---
    async fn create_idea(&self, title: &str, description: &str) -> PortResult<Idea>;

    async fn get_idea(&self, idea_id: Uuid) -> PortResult<Idea>;

    async fn list_ideas(&self) -> PortResult<Vec<Idea>>;
}

/// A single chat-completion call against a hosted language model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: &'static str,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Returns the raw text of the model's first choice.
    async fn complete(&self, request: CompletionRequest) -> PortResult<String>;
}

/// Receives a signal whenever a presentation's visible state changes, so
/// clients holding a cached copy know to refetch it.
pub trait ChangeNotifier: Send + Sync {
    fn presentation_changed(&self, presentation_id: Uuid);
}
