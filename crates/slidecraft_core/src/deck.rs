//! crates/slidecraft_core/src/deck.rs
//!
//! The editor-facing operations. Each one loads what it needs through the
//! store port, applies the core rules, writes the result in a single store
//! call, and announces the change for the affected presentation.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::annotations::AnnotationDocument;
use crate::domain::{
    Angle, Framework, GeneratedSlide, Idea, NewFramework, NewPresentation, Presentation,
    PresentationSettings, Slide, SlideColors, SlideDraft, SlideLayout, SlideOrder, SlideType,
    SlideUpdate, VoiceProfile,
};
use crate::generation::GenerationPipeline;
use crate::ordering::{clamp_position, next_order};
use crate::ports::{ChangeNotifier, PortError, PortResult, PresentationStore};
use crate::theme::{resolve_theme_defaults, LIGHT};

pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const NEW_SLIDE_TITLE: &str = "New Slide";

/// Input for generating a brand-new presentation.
#[derive(Debug, Clone, Default)]
pub struct GeneratePresentation {
    pub topic: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub voice_profile_id: Option<Uuid>,
    pub framework_id: Option<Uuid>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_family: Option<String>,
}

/// Input for the editor's "add slide" action. Unset fields take editor defaults.
#[derive(Debug, Clone, Default)]
pub struct AddSlide {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slide_type: Option<SlideType>,
    pub layout: Option<SlideLayout>,
    /// 1-based target order; appended when absent.
    pub position: Option<i32>,
}

/// A presentation with its slides in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationDetail {
    pub presentation: Presentation,
    pub slides: Vec<Slide>,
}

#[derive(Clone)]
pub struct DeckService {
    store: Arc<dyn PresentationStore>,
    pipeline: GenerationPipeline,
    notifier: Arc<dyn ChangeNotifier>,
}

impl DeckService {
    pub fn new(
        store: Arc<dyn PresentationStore>,
        pipeline: GenerationPipeline,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            store,
            pipeline,
            notifier,
        }
    }

    //=====================================================================================
    // Presentations
    //=====================================================================================

    pub async fn generate_presentation(
        &self,
        request: GeneratePresentation,
    ) -> PortResult<PresentationDetail> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(PortError::Invalid("A topic is required".to_string()));
        }
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(topic)
            .to_string();

        let voice = self.load_voice(request.voice_profile_id).await?;
        let framework = match request.framework_id {
            Some(id) => Some(self.store.get_framework(id).await?),
            None => None,
        };

        let generated = self
            .pipeline
            .generate(topic, &title, voice.as_ref(), framework.as_ref())
            .await;

        let new_presentation = NewPresentation {
            title,
            description: request.description,
            prompt: topic.to_string(),
            primary_color: request
                .primary_color
                .unwrap_or_else(|| LIGHT.primary_color.to_string()),
            secondary_color: request
                .secondary_color
                .unwrap_or_else(|| LIGHT.secondary_color.to_string()),
            font_family: request
                .font_family
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            voice_profile_id: voice.as_ref().map(|v| v.id),
            framework_id: framework.as_ref().map(|f| f.id),
        };
        self.persist_generated(new_presentation, generated).await
    }

    /// Expands an angle of an idea into a new presentation with narration.
    pub async fn create_presentation_from_angle(
        &self,
        idea_id: Uuid,
        angle: Angle,
        voice_profile_id: Option<Uuid>,
    ) -> PortResult<PresentationDetail> {
        let idea = self.store.get_idea(idea_id).await?;
        let voice = self.load_voice(voice_profile_id).await?;

        let generated = self.pipeline.expand_angle(&idea, &angle, voice.as_ref()).await;

        let new_presentation = NewPresentation {
            title: angle.title.clone(),
            description: Some(angle.description.clone()),
            prompt: format!("{}: {}", idea.title, idea.description),
            primary_color: LIGHT.primary_color.to_string(),
            secondary_color: LIGHT.secondary_color.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            voice_profile_id: voice.as_ref().map(|v| v.id),
            framework_id: angle.framework_id,
        };
        self.persist_generated(new_presentation, generated).await
    }

    async fn persist_generated(
        &self,
        new_presentation: NewPresentation,
        mut generated: Vec<GeneratedSlide>,
    ) -> PortResult<PresentationDetail> {
        // The store numbers slides by position, so sort by the order the model gave.
        generated.sort_by_key(|s| s.order);
        let drafts: Vec<SlideDraft> = generated.into_iter().map(GeneratedSlide::into_draft).collect();

        let presentation = self
            .store
            .create_presentation(new_presentation, drafts)
            .await?;
        let slides = self.store.list_slides(presentation.id).await?;
        info!(
            "Created presentation {} with {} slides",
            presentation.id,
            slides.len()
        );
        self.notifier.presentation_changed(presentation.id);
        Ok(PresentationDetail {
            presentation,
            slides,
        })
    }

    pub async fn get_presentation(&self, presentation_id: Uuid) -> PortResult<PresentationDetail> {
        let presentation = self.store.get_presentation(presentation_id).await?;
        let slides = self.store.list_slides(presentation_id).await?;
        Ok(PresentationDetail {
            presentation,
            slides,
        })
    }

    pub async fn list_presentations(&self) -> PortResult<Vec<Presentation>> {
        self.store.list_presentations().await
    }

    pub async fn update_presentation_settings(
        &self,
        presentation_id: Uuid,
        settings: PresentationSettings,
    ) -> PortResult<Presentation> {
        if settings.title.trim().is_empty() {
            return Err(PortError::Invalid("Title must not be empty".to_string()));
        }
        let presentation = self
            .store
            .update_presentation_settings(presentation_id, settings)
            .await?;
        self.notifier.presentation_changed(presentation_id);
        Ok(presentation)
    }

    pub async fn delete_presentation(&self, presentation_id: Uuid) -> PortResult<()> {
        self.store.delete_presentation(presentation_id).await?;
        self.notifier.presentation_changed(presentation_id);
        Ok(())
    }

    //=====================================================================================
    // Slides
    //=====================================================================================

    /// Creates a slide coloured by the presentation's theme, at `position` or at the end.
    pub async fn add_slide(&self, presentation_id: Uuid, request: AddSlide) -> PortResult<Slide> {
        let presentation = self.store.get_presentation(presentation_id).await?;
        let existing = self.store.list_slides(presentation_id).await?;
        let position = match request.position {
            Some(position) => clamp_position(&existing, position)?,
            None => next_order(&existing),
        };

        let slide_type = request.slide_type.unwrap_or(SlideType::Content);
        let mut draft = SlideDraft::new(
            request
                .title
                .unwrap_or_else(|| NEW_SLIDE_TITLE.to_string()),
            request.content.unwrap_or_default(),
            slide_type,
        );
        if let Some(layout) = request.layout {
            draft.layout = layout;
        }
        let colors = resolve_theme_defaults(&presentation.primary_color, &presentation.secondary_color)
            .colors();
        draft.background_color = Some(colors.background_color);
        draft.text_color = Some(colors.text_color);
        draft.heading_color = Some(colors.heading_color);

        let slide = self
            .store
            .insert_slide_at(presentation_id, position, draft)
            .await?;
        self.notifier.presentation_changed(presentation_id);
        Ok(slide)
    }

    /// Copies a slide into the position right after it.
    pub async fn duplicate_slide(&self, slide_id: Uuid) -> PortResult<Slide> {
        let source = self.store.get_slide(slide_id).await?;
        let copy = self
            .store
            .insert_slide_at(source.presentation_id, source.order + 1, source.to_draft())
            .await?;
        self.notifier.presentation_changed(source.presentation_id);
        Ok(copy)
    }

    /// Deletes a slide. Later slides keep their orders.
    pub async fn delete_slide(&self, slide_id: Uuid) -> PortResult<()> {
        let slide = self.store.get_slide(slide_id).await?;
        self.store.delete_slide(slide_id).await?;
        self.notifier.presentation_changed(slide.presentation_id);
        Ok(())
    }

    pub async fn reorder_slides(
        &self,
        presentation_id: Uuid,
        orders: Vec<SlideOrder>,
    ) -> PortResult<()> {
        if let Some(bad) = orders.iter().find(|o| o.order < 1) {
            return Err(PortError::Invalid(format!(
                "Slide {} has order {}, orders start at 1",
                bad.slide_id, bad.order
            )));
        }
        self.store.reorder_slides(presentation_id, orders).await?;
        self.notifier.presentation_changed(presentation_id);
        Ok(())
    }

    /// Writes the full editable field set of a slide. Annotation payloads must
    /// parse; a blank payload clears the overlay.
    pub async fn update_slide(&self, slide_id: Uuid, mut update: SlideUpdate) -> PortResult<Slide> {
        if update.0.annotations.as_deref().is_some_and(|a| a.trim().is_empty()) {
            update.0.annotations = None;
        }
        if let Some(payload) = update.0.annotations.as_deref() {
            AnnotationDocument::parse(payload).map_err(|e| PortError::Invalid(e.to_string()))?;
        }
        let slide = self.store.update_slide(slide_id, update).await?;
        self.notifier.presentation_changed(slide.presentation_id);
        Ok(slide)
    }

    /// Gives every slide of the presentation the same three colours.
    pub async fn apply_theme_to_all(
        &self,
        presentation_id: Uuid,
        colors: SlideColors,
    ) -> PortResult<u64> {
        self.store.get_presentation(presentation_id).await?;
        let updated = self
            .store
            .apply_colors_to_all(presentation_id, colors)
            .await?;
        self.notifier.presentation_changed(presentation_id);
        Ok(updated)
    }

    /// Rewrites one slide with the model and saves it in place.
    pub async fn regenerate_slide(
        &self,
        slide_id: Uuid,
        additional_context: Option<String>,
        voice_profile_id: Option<Uuid>,
    ) -> PortResult<Slide> {
        let slide = self.store.get_slide(slide_id).await?;
        let presentation = self.store.get_presentation(slide.presentation_id).await?;

        let voice = match voice_profile_id {
            Some(_) => self.load_voice(voice_profile_id).await?,
            None => match self.load_voice(presentation.voice_profile_id).await {
                Ok(voice) => voice,
                Err(e) => {
                    warn!("Ignoring presentation voice profile: {}", e);
                    None
                }
            },
        };

        let generated = self
            .pipeline
            .regenerate(
                &slide,
                &presentation.prompt,
                additional_context.as_deref(),
                voice.as_ref(),
            )
            .await;

        let mut draft = slide.to_draft();
        draft.title = generated.title;
        draft.content = generated.content;
        draft.narration = generated.narration;
        draft.slide_type = generated.slide_type;
        draft.layout = generated.layout;

        let saved = self.store.update_slide(slide_id, SlideUpdate(draft)).await?;
        self.notifier.presentation_changed(saved.presentation_id);
        Ok(saved)
    }

    //=====================================================================================
    // Catalog
    //=====================================================================================

    pub async fn create_framework(&self, framework: NewFramework) -> PortResult<Framework> {
        if framework.name.trim().is_empty() {
            return Err(PortError::Invalid("Framework name must not be empty".to_string()));
        }
        self.store.create_framework(framework).await
    }

    pub async fn get_framework(&self, framework_id: Uuid) -> PortResult<Framework> {
        self.store.get_framework(framework_id).await
    }

    pub async fn list_frameworks(&self) -> PortResult<Vec<Framework>> {
        self.store.list_frameworks().await
    }

    pub async fn create_voice_profile(&self, profile: VoiceProfile) -> PortResult<VoiceProfile> {
        if profile.name.trim().is_empty() {
            return Err(PortError::Invalid("Voice profile name must not be empty".to_string()));
        }
        self.store.create_voice_profile(profile).await
    }

    pub async fn get_voice_profile(&self, profile_id: Uuid) -> PortResult<VoiceProfile> {
        self.store.get_voice_profile(profile_id).await
    }

    pub async fn list_voice_profiles(&self) -> PortResult<Vec<VoiceProfile>> {
        self.store.list_voice_profiles().await
    }

    pub async fn create_idea(&self, title: &str, description: &str) -> PortResult<Idea> {
        if title.trim().is_empty() {
            return Err(PortError::Invalid("Idea title must not be empty".to_string()));
        }
        self.store.create_idea(title.trim(), description.trim()).await
    }

    pub async fn get_idea(&self, idea_id: Uuid) -> PortResult<Idea> {
        self.store.get_idea(idea_id).await
    }

    pub async fn list_ideas(&self) -> PortResult<Vec<Idea>> {
        self.store.list_ideas().await
    }

    /// One candidate angle per rhetorical framework for a stored idea.
    pub async fn generate_angles(&self, idea_id: Uuid) -> PortResult<Vec<Angle>> {
        let idea = self.store.get_idea(idea_id).await?;
        let frameworks = self.store.list_frameworks().await?;
        Ok(self.pipeline.generate_angles(&idea, &frameworks).await)
    }

    async fn load_voice(&self, profile_id: Option<Uuid>) -> PortResult<Option<VoiceProfile>> {
        match profile_id {
            Some(id) => Ok(Some(self.store.get_voice_profile(id).await?)),
            None => Ok(None),
        }
    }
}
