//! crates/slidecraft_core/src/generation/pipeline.rs
//!
//! The content generation pipeline: template, call, parse, normalize, and fall
//! back. None of these operations return an error to the caller; each has one
//! fallback branch and no retries.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    Angle, Framework, GeneratedSlide, Idea, Slide, SlideLayout, SlideType, VoiceProfile,
};
use crate::generation::angles::{
    blueprint, blueprint_fallback, framework_list, parse_angles, render_blueprint,
    render_key_points, select_angles, RawAngle,
};
use crate::generation::fallback::{fallback_slides, regeneration_fallback};
use crate::generation::normalize::{normalize_slides, parse_single_slide, parse_slides, RawSlide};
use crate::generation::prompt::{
    framework_context, voice_context, Placeholder, PromptContext, PromptError, PromptTemplate,
    ANGLES_TEMPLATE, DECK_TEMPLATE, EXPANSION_TEMPLATE, REGENERATE_TEMPLATE,
};
use crate::ports::{CompletionRequest, LanguageModelService, PortError};

const DECK_TEMPERATURE: f32 = 0.7;
const DECK_MAX_TOKENS: u32 = 4000;
const REGENERATE_TEMPERATURE: f32 = 0.7;
const REGENERATE_MAX_TOKENS: u32 = 1500;
const ANGLES_TEMPERATURE: f32 = 0.8;
const ANGLES_MAX_TOKENS: u32 = 2000;
const EXPANSION_TEMPERATURE: f32 = 0.7;
const EXPANSION_MAX_TOKENS: u32 = 8000;

/// Why a model-backed step could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),
    #[error("Model call failed: {0}")]
    Model(#[from] PortError),
    #[error("Could not parse model response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Model response contained no slides")]
    Empty,
}

#[derive(Clone)]
pub struct GenerationPipeline {
    model: Arc<dyn LanguageModelService>,
}

impl GenerationPipeline {
    pub fn new(model: Arc<dyn LanguageModelService>) -> Self {
        Self { model }
    }

    async fn call(
        &self,
        template: &PromptTemplate,
        context: &PromptContext,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            system_prompt: template.system_prompt,
            user_prompt: template.render(context)?,
            temperature,
            max_tokens,
        };
        Ok(self.model.complete(request).await?)
    }

    //=====================================================================================
    // Deck Generation
    //=====================================================================================

    /// Produces a full, normalized slide set for a topic, or the fixed skeleton.
    pub async fn generate(
        &self,
        topic: &str,
        title: &str,
        voice: Option<&VoiceProfile>,
        framework: Option<&Framework>,
    ) -> Vec<GeneratedSlide> {
        match self.try_generate(topic, title, voice, framework).await {
            Ok(slides) => {
                info!("Generated {} slides for '{}'", slides.len(), title);
                slides
            }
            Err(e) => {
                warn!("Slide generation failed, using fallback skeleton: {}", e);
                fallback_slides(topic)
            }
        }
    }

    async fn try_generate(
        &self,
        topic: &str,
        title: &str,
        voice: Option<&VoiceProfile>,
        framework: Option<&Framework>,
    ) -> Result<Vec<GeneratedSlide>, GenerationError> {
        let context = PromptContext::new()
            .with(Placeholder::Topic, topic)
            .with(Placeholder::Title, title)
            .with(Placeholder::VoiceContext, voice_context(voice))
            .with(Placeholder::FrameworkContext, framework_context(framework));

        let response = self
            .call(&DECK_TEMPLATE, &context, DECK_TEMPERATURE, DECK_MAX_TOKENS)
            .await?;
        let slides = normalize_slides(parse_slides(&response)?);
        if slides.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(slides)
    }

    //=====================================================================================
    // Single-Slide Regeneration
    //=====================================================================================

    /// Rewrites one slide. The result always keeps the original's order; on
    /// failure the original content is kept with a marker appended.
    pub async fn regenerate(
        &self,
        original: &Slide,
        topic: &str,
        additional_context: Option<&str>,
        voice: Option<&VoiceProfile>,
    ) -> GeneratedSlide {
        match self
            .try_regenerate(original, topic, additional_context, voice)
            .await
        {
            Ok(slide) => slide,
            Err(e) => {
                warn!("Regeneration of slide {} failed, keeping original: {}", original.id, e);
                regeneration_fallback(original)
            }
        }
    }

    async fn try_regenerate(
        &self,
        original: &Slide,
        topic: &str,
        additional_context: Option<&str>,
        voice: Option<&VoiceProfile>,
    ) -> Result<GeneratedSlide, GenerationError> {
        let additional = additional_context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("None.");
        let context = PromptContext::new()
            .with(Placeholder::Topic, topic)
            .with(Placeholder::SlideTitle, original.title.as_str())
            .with(Placeholder::SlideContent, original.content.as_str())
            .with(Placeholder::SlideType, original.slide_type.as_str())
            .with(Placeholder::SlideLayout, original.layout.as_str())
            .with(Placeholder::AdditionalContext, additional)
            .with(Placeholder::VoiceContext, voice_context(voice));

        let response = self
            .call(
                &REGENERATE_TEMPLATE,
                &context,
                REGENERATE_TEMPERATURE,
                REGENERATE_MAX_TOKENS,
            )
            .await?;
        let raw = parse_single_slide(&response)?.ok_or(GenerationError::Empty)?;

        // Gaps in the model's answer are filled from the original, not inferred.
        let merged = RawSlide {
            title: raw
                .title
                .filter(|t| !t.trim().is_empty())
                .or_else(|| Some(original.title.clone())),
            content: raw.content,
            narration: raw.narration.or_else(|| original.narration.clone()),
            slide_type: raw
                .slide_type
                .filter(|t| SlideType::parse(t).is_some())
                .or_else(|| Some(original.slide_type.as_str().to_string())),
            layout: raw
                .layout
                .filter(|l| SlideLayout::parse(l).is_some())
                .or_else(|| Some(original.layout.as_str().to_string())),
            order: Some(original.order as i64),
        };
        let mut slide = normalize_slides(vec![merged])
            .pop()
            .ok_or(GenerationError::Empty)?;
        if slide.content.is_empty() {
            slide.content = original.content.clone();
        }
        slide.order = original.order;
        Ok(slide)
    }

    //=====================================================================================
    // Angles
    //=====================================================================================

    /// Exactly one angle per rhetorical framework, in framework order.
    pub async fn generate_angles(&self, idea: &Idea, frameworks: &[Framework]) -> Vec<Angle> {
        let raw = match self.try_generate_angles(idea).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Angle generation for idea {} failed, synthesizing angles: {}", idea.id, e);
                Vec::new()
            }
        };
        select_angles(idea, raw, frameworks)
    }

    async fn try_generate_angles(
        &self,
        idea: &Idea,
    ) -> Result<Vec<RawAngle>, GenerationError> {
        let context = PromptContext::new()
            .with(Placeholder::IdeaTitle, idea.title.as_str())
            .with(Placeholder::IdeaDescription, idea.description.as_str())
            .with(Placeholder::FrameworkList, framework_list());
        let response = self
            .call(&ANGLES_TEMPLATE, &context, ANGLES_TEMPERATURE, ANGLES_MAX_TOKENS)
            .await?;
        Ok(parse_angles(&response)?)
    }

    /// Expands a chosen angle into a full deck with narration.
    pub async fn expand_angle(
        &self,
        idea: &Idea,
        angle: &Angle,
        voice: Option<&VoiceProfile>,
    ) -> Vec<GeneratedSlide> {
        let plan = blueprint(angle);
        match self.try_expand_angle(idea, angle, voice, &render_blueprint(&plan), plan.len()).await {
            Ok(slides) => {
                if slides.len() != plan.len() {
                    warn!(
                        "Expansion returned {} slides, outline had {}",
                        slides.len(),
                        plan.len()
                    );
                }
                slides
            }
            Err(e) => {
                warn!("Angle expansion for idea {} failed, using outline: {}", idea.id, e);
                blueprint_fallback(idea, angle, &plan)
            }
        }
    }

    async fn try_expand_angle(
        &self,
        idea: &Idea,
        angle: &Angle,
        voice: Option<&VoiceProfile>,
        outline: &str,
        slide_count: usize,
    ) -> Result<Vec<GeneratedSlide>, GenerationError> {
        let context = PromptContext::new()
            .with(Placeholder::IdeaTitle, idea.title.as_str())
            .with(Placeholder::IdeaDescription, idea.description.as_str())
            .with(Placeholder::AngleTitle, angle.title.as_str())
            .with(Placeholder::AngleDescription, angle.description.as_str())
            .with(Placeholder::FrameworkName, angle.framework.name())
            .with(Placeholder::KeyPoints, render_key_points(angle))
            .with(Placeholder::Blueprint, outline)
            .with(Placeholder::SlideCount, slide_count.to_string())
            .with(Placeholder::VoiceContext, voice_context(voice));
        let response = self
            .call(
                &EXPANSION_TEMPLATE,
                &context,
                EXPANSION_TEMPERATURE,
                EXPANSION_MAX_TOKENS,
            )
            .await?;
        let slides = normalize_slides(parse_slides(&response)?);
        if slides.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RhetoricalFramework, SlideDraft};
    use crate::generation::fallback::REGENERATION_FALLBACK_MARKER;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Answers every call with the same scripted result and records the requests.
    struct ScriptedModel {
        reply: Result<String, String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text.to_string()), requests: Mutex::new(Vec::new()) })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { reply: Err(message.to_string()), requests: Mutex::new(Vec::new()) })
        }

        fn last_prompt(&self) -> String {
            self.requests.lock().unwrap().last().unwrap().user_prompt.clone()
        }
    }

    #[async_trait]
    impl LanguageModelService for ScriptedModel {
        async fn complete(&self, request: CompletionRequest) -> PortResult<String> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone().map_err(PortError::Unexpected)
        }
    }

    fn idea() -> Idea {
        Idea {
            id: Uuid::new_v4(),
            title: "Async Rust".into(),
            description: "Teaching futures to backend developers.".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn untyped_response_is_normalized_by_position() {
        let model = ScriptedModel::replying(
            "```json\n[{\"title\": \"Async Rust\"}, {\"title\": \"Introduction\"}, {\"title\": \"Futures\"}, {\"title\": \"Executors\"}, {\"title\": \"Wrap-up\"}]\n```",
        );
        let pipeline = GenerationPipeline::new(model.clone());
        let slides = pipeline.generate("async rust", "Async Rust", None, None).await;

        assert_eq!(slides.len(), 5);
        assert_eq!(slides.first().unwrap().slide_type, SlideType::Title);
        assert!(matches!(
            slides.last().unwrap().slide_type,
            SlideType::NextSteps | SlideType::Conclusion
        ));
        let prompt = model.last_prompt();
        assert!(prompt.contains("TOPIC: async rust"));
        assert!(prompt.contains(crate::generation::prompt::DEFAULT_VOICE_CONTEXT));
        assert!(!prompt.contains("FRAMEWORK:"));
    }

    #[tokio::test]
    async fn network_error_returns_fallback_skeleton() {
        let pipeline = GenerationPipeline::new(ScriptedModel::failing("connection reset"));
        let slides = pipeline.generate("Kubernetes", "K8s 101", None, None).await;
        let types: Vec<SlideType> = slides.iter().map(|s| s.slide_type).collect();
        assert_eq!(
            types,
            vec![SlideType::Title, SlideType::Intro, SlideType::Content, SlideType::Conclusion]
        );
        assert_eq!(slides, fallback_slides("Kubernetes"));
    }

    #[tokio::test]
    async fn unparseable_or_empty_response_falls_back() {
        for reply in ["I cannot help with that.", "[]"] {
            let pipeline = GenerationPipeline::new(ScriptedModel::replying(reply));
            let slides = pipeline.generate("Topic", "Title", None, None).await;
            assert_eq!(slides, fallback_slides("Topic"));
        }
    }

    #[tokio::test]
    async fn code_blocks_in_slide_content_do_not_break_parsing() {
        let bare = r#"[{"title": "Rust"}, {"title": "Hello", "content": "```rust\nfn main() {}\n```"}, {"title": "Wrap-up"}]"#;
        let fenced = format!("```json\n{}\n```", bare);

        for reply in [bare.to_string(), fenced] {
            let pipeline = GenerationPipeline::new(ScriptedModel::replying(&reply));
            let slides = pipeline.generate("Rust", "Rust", None, None).await;

            assert_ne!(slides, fallback_slides("Rust"));
            assert_eq!(slides.len(), 3);
            assert_eq!(slides[1].title, "Hello");
            assert_eq!(slides[1].content, "```rust\nfn main() {}\n```");
        }
    }

    #[tokio::test]
    async fn framework_slides_are_sent_to_the_model() {
        let model = ScriptedModel::replying(r#"[{"title": "Only"}]"#);
        let framework = Framework {
            id: Uuid::new_v4(),
            name: "Pitch".into(),
            description: None,
            is_default: true,
            slides: vec![crate::domain::FrameworkSlide {
                id: Uuid::new_v4(),
                title: "Cover".into(),
                instructions: "Company and tagline".into(),
                slide_type: SlideType::Title,
                layout: SlideLayout::TitleCover,
                order: 1,
            }],
        };
        let pipeline = GenerationPipeline::new(model.clone());
        pipeline.generate("t", "T", None, Some(&framework)).await;
        let prompt = model.last_prompt();
        assert!(prompt.contains("exactly 1 slides"));
        assert!(prompt.contains("Instructions: Company and tagline"));
    }

    fn original_slide() -> Slide {
        let mut draft = SlideDraft::new("Executors", "Tokio runs tasks.", SlideType::Content);
        draft.layout = SlideLayout::TwoColumn;
        draft.into_slide(Uuid::new_v4(), Uuid::new_v4(), 4)
    }

    #[tokio::test]
    async fn regeneration_keeps_order_and_fills_gaps_from_original() {
        let model = ScriptedModel::replying(
            r#"{"title": "How executors schedule tasks", "content": "- Polling\n- Wakers", "order": 1, "layout": "SPIRAL"}"#,
        );
        let pipeline = GenerationPipeline::new(model.clone());
        let original = original_slide();
        let slide = pipeline
            .regenerate(&original, "async rust", Some("mention wakers"), None)
            .await;

        assert_eq!(slide.order, 4);
        assert_eq!(slide.title, "How executors schedule tasks");
        assert_eq!(slide.slide_type, SlideType::Content);
        assert_eq!(slide.layout, SlideLayout::TwoColumn);
        assert!(model.last_prompt().contains("mention wakers"));
    }

    #[tokio::test]
    async fn regeneration_failure_appends_marker() {
        let pipeline = GenerationPipeline::new(ScriptedModel::failing("timeout"));
        let original = original_slide();
        let slide = pipeline.regenerate(&original, "async rust", None, None).await;
        assert_eq!(slide.order, original.order);
        assert_eq!(
            slide.content,
            format!("Tokio runs tasks.\n\n{}", REGENERATION_FALLBACK_MARKER)
        );
    }

    #[tokio::test]
    async fn regeneration_reply_without_a_slide_appends_marker() {
        for reply in [r#"{"error": "content policy"}"#, "{}"] {
            let pipeline = GenerationPipeline::new(ScriptedModel::replying(reply));
            let original = original_slide();
            let slide = pipeline.regenerate(&original, "async rust", None, None).await;
            assert_eq!(slide.title, original.title);
            assert_eq!(
                slide.content,
                format!("Tokio runs tasks.\n\n{}", REGENERATION_FALLBACK_MARKER)
            );
        }
    }

    #[tokio::test]
    async fn angles_cover_every_framework() {
        let model = ScriptedModel::replying(
            r#"{"angles": [{"framework": "HEAR", "title": "You are not behind", "keyPoints": ["Fear", "Path"]}]}"#,
        );
        let pipeline = GenerationPipeline::new(model);
        let angles = pipeline.generate_angles(&idea(), &[]).await;
        assert_eq!(angles.len(), 4);
        assert_eq!(angles[2].framework, RhetoricalFramework::Hear);
        assert_eq!(angles[2].title, "You are not behind");

        let offline = GenerationPipeline::new(ScriptedModel::failing("down"));
        let angles = offline.generate_angles(&idea(), &[]).await;
        assert_eq!(
            angles.iter().map(|a| a.framework).collect::<Vec<_>>(),
            RhetoricalFramework::ALL.to_vec()
        );
    }

    #[tokio::test]
    async fn expansion_uses_outline_and_falls_back_to_it() {
        let idea = idea();
        let angle = crate::generation::angles::fallback_angle(&idea, RhetoricalFramework::Wwh);
        let plan = blueprint(&angle);

        let model = ScriptedModel::replying(
            r#"[{"title": "Async Rust", "content": "x", "narration": "Welcome everyone."}, {"title": "Next steps"}]"#,
        );
        let pipeline = GenerationPipeline::new(model.clone());
        let slides = pipeline.expand_angle(&idea, &angle, None).await;
        assert_eq!(slides[0].narration.as_deref(), Some("Welcome everyone."));
        assert!(model
            .last_prompt()
            .contains(&format!("exactly {} slides", plan.len())));

        let offline = GenerationPipeline::new(ScriptedModel::failing("down"));
        let slides = offline.expand_angle(&idea, &angle, None).await;
        assert_eq!(slides.len(), plan.len());
        assert_eq!(slides.last().unwrap().slide_type, SlideType::NextSteps);
    }
}
