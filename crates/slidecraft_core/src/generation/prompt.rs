//! crates/slidecraft_core/src/generation/prompt.rs
//!
//! Prompt templates and the context blocks substituted into them.
//!
//! Each template declares the placeholders it uses. Rendering is a single pass:
//! values are never re-scanned, so user text containing `{title}` stays literal.

use std::collections::HashMap;

use crate::domain::{Framework, VoiceProfile};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Template '{template}' is missing a value for {placeholder}")]
    MissingValue {
        template: &'static str,
        placeholder: &'static str,
    },
}

/// Every placeholder any template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Topic,
    Title,
    VoiceContext,
    FrameworkContext,
    SlideTitle,
    SlideContent,
    SlideType,
    SlideLayout,
    AdditionalContext,
    IdeaTitle,
    IdeaDescription,
    FrameworkList,
    AngleTitle,
    AngleDescription,
    FrameworkName,
    KeyPoints,
    Blueprint,
    SlideCount,
}

impl Placeholder {
    pub const ALL: [Placeholder; 18] = [
        Placeholder::Topic,
        Placeholder::Title,
        Placeholder::VoiceContext,
        Placeholder::FrameworkContext,
        Placeholder::SlideTitle,
        Placeholder::SlideContent,
        Placeholder::SlideType,
        Placeholder::SlideLayout,
        Placeholder::AdditionalContext,
        Placeholder::IdeaTitle,
        Placeholder::IdeaDescription,
        Placeholder::FrameworkList,
        Placeholder::AngleTitle,
        Placeholder::AngleDescription,
        Placeholder::FrameworkName,
        Placeholder::KeyPoints,
        Placeholder::Blueprint,
        Placeholder::SlideCount,
    ];

    /// The name between the braces.
    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::Topic => "topic",
            Placeholder::Title => "title",
            Placeholder::VoiceContext => "voice_context",
            Placeholder::FrameworkContext => "framework_context",
            Placeholder::SlideTitle => "slide_title",
            Placeholder::SlideContent => "slide_content",
            Placeholder::SlideType => "slide_type",
            Placeholder::SlideLayout => "slide_layout",
            Placeholder::AdditionalContext => "additional_context",
            Placeholder::IdeaTitle => "idea_title",
            Placeholder::IdeaDescription => "idea_description",
            Placeholder::FrameworkList => "framework_list",
            Placeholder::AngleTitle => "angle_title",
            Placeholder::AngleDescription => "angle_description",
            Placeholder::FrameworkName => "framework_name",
            Placeholder::KeyPoints => "key_points",
            Placeholder::Blueprint => "blueprint",
            Placeholder::SlideCount => "slide_count",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Values for one render.
#[derive(Debug, Default, Clone)]
pub struct PromptContext {
    values: HashMap<Placeholder, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }
}

/// A fixed prompt with a closed set of placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub text: &'static str,
    pub placeholders: &'static [Placeholder],
}

impl PromptTemplate {
    pub fn render(&self, context: &PromptContext) -> Result<String, PromptError> {
        for placeholder in self.placeholders {
            if context.get(*placeholder).is_none() {
                return Err(PromptError::MissingValue {
                    template: self.name,
                    placeholder: placeholder.key(),
                });
            }
        }

        let mut out = String::with_capacity(self.text.len() * 2);
        let mut rest = self.text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let placeholder = Placeholder::from_key(&after[..close])
                    .filter(|p| self.placeholders.contains(p))?;
                Some((close, context.get(placeholder).unwrap_or_default()))
            });
            match substituted {
                Some((close, value)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

//=========================================================================================
// System Prompts
//=========================================================================================

const DECK_SYSTEM_PROMPT: &str = "You are an expert presentation designer and copywriter. You create clear, well-structured slide decks and always answer with valid JSON only, without commentary.";

const REGENERATE_SYSTEM_PROMPT: &str = "You are an expert presentation editor. You improve a single slide while keeping its purpose and position in the deck, and you always answer with a single valid JSON object only.";

const ANGLES_SYSTEM_PROMPT: &str = "You are a presentation strategist. You find distinct, compelling ways to frame an idea for an audience and always answer with valid JSON only.";

const EXPANSION_SYSTEM_PROMPT: &str = "You are an expert presentation writer and speaker coach. You turn a structural outline into finished slides with speaker narration and always answer with valid JSON only.";

//=========================================================================================
// Templates
//=========================================================================================

pub const DECK_TEMPLATE: PromptTemplate = PromptTemplate {
    name: "deck",
    system_prompt: DECK_SYSTEM_PROMPT,
    placeholders: &[
        Placeholder::Topic,
        Placeholder::Title,
        Placeholder::VoiceContext,
        Placeholder::FrameworkContext,
    ],
    text: r#"Create a slide presentation.

TITLE: {title}
TOPIC: {topic}

VOICE AND STYLE:
{voice_context}

{framework_context}

Requirements:
- The first slide is the title slide.
- Write slide content in markdown (short paragraphs or bullet points).
- Keep each slide focused on one idea.
- End with a conclusion or clear next steps.

Respond with a JSON array only. Each element must look like:
[ { "title": "Slide title", "content": "Markdown content", "slideType": "TITLE | INTRO | CONTENT | CONCLUSION | NEXT_STEPS", "layout": "TEXT_ONLY | TITLE_COVER | TWO_COLUMN | BULLET_LIST | SECTION_HEADER | QUOTE | ...", "order": 1 } ]"#,
};

pub const REGENERATE_TEMPLATE: PromptTemplate = PromptTemplate {
    name: "regenerate",
    system_prompt: REGENERATE_SYSTEM_PROMPT,
    placeholders: &[
        Placeholder::Topic,
        Placeholder::SlideTitle,
        Placeholder::SlideContent,
        Placeholder::SlideType,
        Placeholder::SlideLayout,
        Placeholder::AdditionalContext,
        Placeholder::VoiceContext,
    ],
    text: r#"Improve the following slide from a presentation about: {topic}

CURRENT SLIDE
Title: {slide_title}
Type: {slide_type}
Layout: {slide_layout}
Content:
{slide_content}

ADDITIONAL CONTEXT:
{additional_context}

VOICE AND STYLE:
{voice_context}

Make the slide clearer, more engaging and more specific. Keep its role in the deck.

Respond with one JSON object only:
{ "title": "Improved title", "content": "Improved markdown content", "slideType": "same or better type", "layout": "same or better layout" }"#,
};

pub const ANGLES_TEMPLATE: PromptTemplate = PromptTemplate {
    name: "angles",
    system_prompt: ANGLES_SYSTEM_PROMPT,
    placeholders: &[
        Placeholder::IdeaTitle,
        Placeholder::IdeaDescription,
        Placeholder::FrameworkList,
    ],
    text: r#"IDEA: {idea_title}
DESCRIPTION: {idea_description}

Propose exactly one presentation angle for each of these rhetorical frameworks:
{framework_list}

Respond with a JSON array only, one element per framework:
[ { "framework": "CUB", "title": "Angle title", "description": "Two sentences on the framing", "keyPoints": ["First major point", "Second major point", "Third major point"] } ]"#,
};

pub const EXPANSION_TEMPLATE: PromptTemplate = PromptTemplate {
    name: "expansion",
    system_prompt: EXPANSION_SYSTEM_PROMPT,
    placeholders: &[
        Placeholder::IdeaTitle,
        Placeholder::IdeaDescription,
        Placeholder::AngleTitle,
        Placeholder::AngleDescription,
        Placeholder::FrameworkName,
        Placeholder::KeyPoints,
        Placeholder::Blueprint,
        Placeholder::SlideCount,
        Placeholder::VoiceContext,
    ],
    text: r#"Write a complete presentation.

IDEA: {idea_title}
DESCRIPTION: {idea_description}

CHOSEN ANGLE: {angle_title}
{angle_description}

FRAMEWORK: {framework_name}
KEY POINTS:
{key_points}

VOICE AND STYLE:
{voice_context}

Follow this structure exactly. The presentation MUST contain exactly {slide_count} slides, in this order:
{blueprint}

For every slide write markdown content for the screen and a spoken narration of 3 to 6 sentences.

Respond with a JSON array only:
[ { "title": "Slide title", "content": "Markdown content", "narration": "What the speaker says", "slideType": "TITLE | INTRO | CONTENT | CONCLUSION | NEXT_STEPS", "layout": "LAYOUT_NAME", "order": 1 } ]"#,
};

pub const ALL_TEMPLATES: [PromptTemplate; 4] = [
    DECK_TEMPLATE,
    REGENERATE_TEMPLATE,
    ANGLES_TEMPLATE,
    EXPANSION_TEMPLATE,
];

//=========================================================================================
// Context Blocks
//=========================================================================================

pub const DEFAULT_VOICE_CONTEXT: &str =
    "Use a clear, professional and engaging tone suitable for a general business audience.";

/// Renders a voice profile's preference lists, or the default sentence.
pub fn voice_context(profile: Option<&VoiceProfile>) -> String {
    let Some(profile) = profile else {
        return DEFAULT_VOICE_CONTEXT.to_string();
    };

    let fields: [(&str, &[String]); 7] = [
        ("Tone", profile.tone.as_slice()),
        ("Audience", profile.audience.as_slice()),
        ("Objective", profile.objective.as_slice()),
        ("Brand voice", profile.brand_voice.as_slice()),
        ("Content style", profile.content_style.as_slice()),
        ("Restrictions", profile.restrictions.as_slice()),
        ("Other", profile.other.as_slice()),
    ];

    let lines: Vec<String> = fields
        .iter()
        .filter(|(_, values)| values.iter().any(|v| !v.trim().is_empty()))
        .map(|(label, values)| {
            let joined = values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {}", label, joined)
        })
        .collect();

    if lines.is_empty() {
        return DEFAULT_VOICE_CONTEXT.to_string();
    }
    format!("Voice profile \"{}\":\n{}", profile.name, lines.join("\n"))
}

/// Lists a framework's slides verbatim and mandates the slide count.
/// Without a framework (or with an empty one) generation is free-form.
pub fn framework_context(framework: Option<&Framework>) -> String {
    let Some(framework) = framework.filter(|f| !f.slides.is_empty()) else {
        return String::new();
    };

    let mut slides = framework.slides.clone();
    slides.sort_by_key(|s| s.order);

    let mut block = format!(
        "FRAMEWORK: Follow the \"{}\" framework. The presentation MUST contain exactly {} slides, in this order:\n",
        framework.name,
        slides.len()
    );
    for (index, slide) in slides.iter().enumerate() {
        block.push_str(&format!(
            "{}. {} (slideType: {}, layout: {})\n   Instructions: {}\n",
            index + 1,
            slide.title,
            slide.slide_type.as_str(),
            slide.layout.as_str(),
            slide.instructions
        ));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FrameworkSlide, SlideLayout, SlideType};
    use regex::Regex;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn full_context(template: &PromptTemplate) -> PromptContext {
        template
            .placeholders
            .iter()
            .fold(PromptContext::new(), |ctx, p| ctx.with(*p, format!("<{}>", p.key())))
    }

    #[test]
    fn templates_use_exactly_their_declared_placeholders() {
        let token = Regex::new(r"\{([a-z_]+)\}").unwrap();
        for template in ALL_TEMPLATES {
            let found: HashSet<&str> = token
                .captures_iter(template.text)
                .map(|c| c.get(1).unwrap().as_str())
                .collect();
            let declared: HashSet<&str> = template.placeholders.iter().map(|p| p.key()).collect();
            assert_eq!(found, declared, "template '{}'", template.name);
        }
    }

    #[test]
    fn rendering_leaves_no_tokens_behind() {
        let token = Regex::new(r"\{[a-z_]+\}").unwrap();
        for template in ALL_TEMPLATES {
            let rendered = template.render(&full_context(&template)).unwrap();
            assert!(!token.is_match(&rendered), "template '{}'", template.name);
        }
    }

    #[test]
    fn missing_value_is_reported() {
        let ctx = PromptContext::new().with(Placeholder::Topic, "Rust");
        let err = DECK_TEMPLATE.render(&ctx).unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingValue { template: "deck", placeholder: "title" }
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let ctx = full_context(&DECK_TEMPLATE)
            .with(Placeholder::Topic, "Why {title} matters")
            .with(Placeholder::Title, "Ownership");
        let rendered = DECK_TEMPLATE.render(&ctx).unwrap();
        assert!(rendered.contains("TOPIC: Why {title} matters"));
        assert!(rendered.contains("TITLE: Ownership"));
    }

    #[test]
    fn json_examples_survive_rendering() {
        let rendered = REGENERATE_TEMPLATE.render(&full_context(&REGENERATE_TEMPLATE)).unwrap();
        assert!(rendered.contains(r#"{ "title": "Improved title""#));
    }

    #[test]
    fn default_voice_when_profile_absent_or_empty() {
        assert_eq!(voice_context(None), DEFAULT_VOICE_CONTEXT);
        let empty = VoiceProfile { name: "Blank".into(), ..Default::default() };
        assert_eq!(voice_context(Some(&empty)), DEFAULT_VOICE_CONTEXT);
    }

    #[test]
    fn voice_profile_fields_are_listed() {
        let profile = VoiceProfile {
            name: "Founder".into(),
            tone: vec!["direct".into(), "warm".into()],
            restrictions: vec!["no jargon".into(), " ".into()],
            ..Default::default()
        };
        let block = voice_context(Some(&profile));
        assert!(block.starts_with("Voice profile \"Founder\":"));
        assert!(block.contains("- Tone: direct, warm"));
        assert!(block.contains("- Restrictions: no jargon"));
        assert!(!block.contains("Audience"));
    }

    #[test]
    fn framework_block_lists_slides_in_order_and_mandates_count() {
        let framework = Framework {
            id: Uuid::new_v4(),
            name: "Pitch".into(),
            description: None,
            is_default: false,
            slides: vec![
                FrameworkSlide {
                    id: Uuid::new_v4(),
                    title: "Ask".into(),
                    instructions: "State the ask".into(),
                    slide_type: SlideType::NextSteps,
                    layout: SlideLayout::Closing,
                    order: 2,
                },
                FrameworkSlide {
                    id: Uuid::new_v4(),
                    title: "Cover".into(),
                    instructions: "Company name".into(),
                    slide_type: SlideType::Title,
                    layout: SlideLayout::TitleCover,
                    order: 1,
                },
            ],
        };
        let block = framework_context(Some(&framework));
        assert!(block.contains("exactly 2 slides"));
        let cover = block.find("1. Cover (slideType: TITLE, layout: TITLE_COVER)").unwrap();
        let ask = block.find("2. Ask (slideType: NEXT_STEPS, layout: CLOSING)").unwrap();
        assert!(cover < ask);
        assert!(block.contains("Instructions: State the ask"));

        assert_eq!(framework_context(None), "");
    }
}
