//! services/api/src/adapters/memory.rs
//!
//! A process-local `PresentationStore`. Used when no `DATABASE_URL` is set and by
//! the integration tests. Mutations run against a copy of the affected rows and
//! are only written back when every step succeeded.

use async_trait::async_trait;
use chrono::Utc;
use slidecraft_core::domain::{
    Framework, FrameworkSlide, Idea, NewFramework, NewPresentation, Presentation,
    PresentationSettings, Slide, SlideColors, SlideDraft, SlideOrder, SlideUpdate, VoiceProfile,
};
use slidecraft_core::ordering::{apply_reorder, insert_at, sort_by_order};
use slidecraft_core::ports::{PortError, PortResult, PresentationStore};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    presentations: HashMap<Uuid, Presentation>,
    /// Slides per presentation, kept sorted by order.
    slides: HashMap<Uuid, Vec<Slide>>,
    frameworks: Vec<Framework>,
    voice_profiles: Vec<VoiceProfile>,
    ideas: Vec<Idea>,
}

impl Tables {
    fn presentation_mut(&mut self, presentation_id: Uuid) -> PortResult<&mut Presentation> {
        self.presentations
            .get_mut(&presentation_id)
            .ok_or_else(|| presentation_not_found(presentation_id))
    }

    fn slide_mut(&mut self, slide_id: Uuid) -> PortResult<&mut Slide> {
        self.slides
            .values_mut()
            .flat_map(|slides| slides.iter_mut())
            .find(|s| s.id == slide_id)
            .ok_or_else(|| slide_not_found(slide_id))
    }
}

fn presentation_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Presentation {} not found", id))
}

fn slide_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Slide {} not found", id))
}

/// An in-memory implementation of `PresentationStore`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresentationStore for InMemoryStore {
    async fn create_presentation(
        &self,
        presentation: NewPresentation,
        slides: Vec<SlideDraft>,
    ) -> PortResult<Presentation> {
        let now = Utc::now();
        let created = Presentation {
            id: Uuid::new_v4(),
            title: presentation.title,
            description: presentation.description,
            prompt: presentation.prompt,
            primary_color: presentation.primary_color,
            secondary_color: presentation.secondary_color,
            font_family: presentation.font_family,
            voice_profile_id: presentation.voice_profile_id,
            framework_id: presentation.framework_id,
            created_at: now,
            updated_at: now,
        };
        let slides = slides
            .into_iter()
            .enumerate()
            .map(|(index, draft)| draft.into_slide(Uuid::new_v4(), created.id, index as i32 + 1))
            .collect();

        let mut tables = self.tables.lock().await;
        tables.slides.insert(created.id, slides);
        tables.presentations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_presentation(&self, presentation_id: Uuid) -> PortResult<Presentation> {
        let mut tables = self.tables.lock().await;
        tables.presentation_mut(presentation_id).map(|p| p.clone())
    }

    async fn list_presentations(&self) -> PortResult<Vec<Presentation>> {
        let tables = self.tables.lock().await;
        let mut presentations: Vec<Presentation> = tables.presentations.values().cloned().collect();
        presentations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(presentations)
    }

    async fn update_presentation_settings(
        &self,
        presentation_id: Uuid,
        settings: PresentationSettings,
    ) -> PortResult<Presentation> {
        let mut tables = self.tables.lock().await;
        let presentation = tables.presentation_mut(presentation_id)?;
        presentation.title = settings.title;
        presentation.description = settings.description;
        presentation.primary_color = settings.primary_color;
        presentation.secondary_color = settings.secondary_color;
        presentation.font_family = settings.font_family;
        presentation.updated_at = Utc::now();
        Ok(presentation.clone())
    }

    async fn delete_presentation(&self, presentation_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.lock().await;
        tables
            .presentations
            .remove(&presentation_id)
            .ok_or_else(|| presentation_not_found(presentation_id))?;
        tables.slides.remove(&presentation_id);
        Ok(())
    }

    async fn list_slides(&self, presentation_id: Uuid) -> PortResult<Vec<Slide>> {
        let tables = self.tables.lock().await;
        Ok(tables.slides.get(&presentation_id).cloned().unwrap_or_default())
    }

    async fn get_slide(&self, slide_id: Uuid) -> PortResult<Slide> {
        let mut tables = self.tables.lock().await;
        tables.slide_mut(slide_id).map(|s| s.clone())
    }

    async fn insert_slide_at(
        &self,
        presentation_id: Uuid,
        position: i32,
        draft: SlideDraft,
    ) -> PortResult<Slide> {
        if position < 1 {
            return Err(PortError::Invalid(format!(
                "Slide position must be at least 1, got {}",
                position
            )));
        }
        let mut tables = self.tables.lock().await;
        tables.presentation_mut(presentation_id)?;

        let slide = draft.into_slide(Uuid::new_v4(), presentation_id, position);
        let slides = tables.slides.entry(presentation_id).or_default();
        insert_at(slides, slide.clone());
        Ok(slide)
    }

    async fn delete_slide(&self, slide_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.lock().await;
        for slides in tables.slides.values_mut() {
            if let Some(index) = slides.iter().position(|s| s.id == slide_id) {
                slides.remove(index);
                return Ok(());
            }
        }
        Err(slide_not_found(slide_id))
    }

    async fn reorder_slides(&self, presentation_id: Uuid, orders: Vec<SlideOrder>) -> PortResult<()> {
        let mut tables = self.tables.lock().await;
        let mut working = tables.slides.get(&presentation_id).cloned().unwrap_or_default();
        apply_reorder(&mut working, &orders)?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = working.iter().find(|s| !seen.insert(s.order)) {
            return Err(PortError::Invalid(format!(
                "Two slides would share order {}",
                duplicate.order
            )));
        }

        sort_by_order(&mut working);
        tables.slides.insert(presentation_id, working);
        Ok(())
    }

    async fn update_slide(&self, slide_id: Uuid, update: SlideUpdate) -> PortResult<Slide> {
        let mut tables = self.tables.lock().await;
        let slide = tables.slide_mut(slide_id)?;
        slide.apply_update(update);
        Ok(slide.clone())
    }

    async fn apply_colors_to_all(
        &self,
        presentation_id: Uuid,
        colors: SlideColors,
    ) -> PortResult<u64> {
        let mut tables = self.tables.lock().await;
        let Some(slides) = tables.slides.get_mut(&presentation_id) else {
            return Ok(0);
        };
        for slide in slides.iter_mut() {
            slide.apply_colors(&colors);
        }
        Ok(slides.len() as u64)
    }

    async fn create_framework(&self, framework: NewFramework) -> PortResult<Framework> {
        let created = Framework {
            id: Uuid::new_v4(),
            name: framework.name,
            description: framework.description,
            is_default: framework.is_default,
            slides: framework
                .slides
                .into_iter()
                .enumerate()
                .map(|(index, slide)| FrameworkSlide {
                    id: Uuid::new_v4(),
                    title: slide.title,
                    instructions: slide.instructions,
                    slide_type: slide.slide_type,
                    layout: slide.layout,
                    order: index as i32 + 1,
                })
                .collect(),
        };
        self.tables.lock().await.frameworks.push(created.clone());
        Ok(created)
    }

    async fn get_framework(&self, framework_id: Uuid) -> PortResult<Framework> {
        let tables = self.tables.lock().await;
        tables
            .frameworks
            .iter()
            .find(|f| f.id == framework_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Framework {} not found", framework_id)))
    }

    async fn list_frameworks(&self) -> PortResult<Vec<Framework>> {
        let tables = self.tables.lock().await;
        let mut frameworks = tables.frameworks.clone();
        frameworks.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
        Ok(frameworks)
    }

    async fn create_voice_profile(&self, profile: VoiceProfile) -> PortResult<VoiceProfile> {
        let created = VoiceProfile {
            id: Uuid::new_v4(),
            ..profile
        };
        self.tables.lock().await.voice_profiles.push(created.clone());
        Ok(created)
    }

    async fn get_voice_profile(&self, profile_id: Uuid) -> PortResult<VoiceProfile> {
        let tables = self.tables.lock().await;
        tables
            .voice_profiles
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Voice profile {} not found", profile_id)))
    }

    async fn list_voice_profiles(&self) -> PortResult<Vec<VoiceProfile>> {
        let tables = self.tables.lock().await;
        let mut profiles = tables.voice_profiles.clone();
        profiles.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
        Ok(profiles)
    }

    async fn create_idea(&self, title: &str, description: &str) -> PortResult<Idea> {
        let created = Idea {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.ideas.push(created.clone());
        Ok(created)
    }

    async fn get_idea(&self, idea_id: Uuid) -> PortResult<Idea> {
        let tables = self.tables.lock().await;
        tables
            .ideas
            .iter()
            .find(|i| i.id == idea_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Idea {} not found", idea_id)))
    }

    async fn list_ideas(&self) -> PortResult<Vec<Idea>> {
        let tables = self.tables.lock().await;
        let mut ideas = tables.ideas.clone();
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ideas)
    }
}
