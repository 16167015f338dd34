//! crates/slidecraft_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database. The closed enums carry their
//! wire names because they travel unchanged between the model, the store and
//! the browser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Slide Enums
//=========================================================================================

/// The narrative role a slide plays within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlideType {
    Title,
    Intro,
    Content,
    Conclusion,
    NextSteps,
}

impl SlideType {
    pub const ALL: [SlideType; 5] = [
        SlideType::Title,
        SlideType::Intro,
        SlideType::Content,
        SlideType::Conclusion,
        SlideType::NextSteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Title => "TITLE",
            SlideType::Intro => "INTRO",
            SlideType::Content => "CONTENT",
            SlideType::Conclusion => "CONCLUSION",
            SlideType::NextSteps => "NEXT_STEPS",
        }
    }

    /// Parses a wire name. Unknown values yield `None` so callers pick the default.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }

    /// The layout a slide of this type receives when none was chosen.
    pub fn default_layout(&self) -> SlideLayout {
        match self {
            SlideType::Title => SlideLayout::TitleCover,
            SlideType::Intro => SlideLayout::TextOnly,
            SlideType::Content => SlideLayout::BulletList,
            SlideType::Conclusion => SlideLayout::TextOnly,
            SlideType::NextSteps => SlideLayout::BulletList,
        }
    }
}

/// The named visual arrangements the editor can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlideLayout {
    TextOnly,
    TitleCover,
    TwoColumn,
    ThreeColumn,
    ImageLeft,
    ImageRight,
    ImageBackground,
    ImageFull,
    BulletList,
    Quote,
    SectionHeader,
    Comparison,
    Timeline,
    Statistics,
    Closing,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; 15] = [
        SlideLayout::TextOnly,
        SlideLayout::TitleCover,
        SlideLayout::TwoColumn,
        SlideLayout::ThreeColumn,
        SlideLayout::ImageLeft,
        SlideLayout::ImageRight,
        SlideLayout::ImageBackground,
        SlideLayout::ImageFull,
        SlideLayout::BulletList,
        SlideLayout::Quote,
        SlideLayout::SectionHeader,
        SlideLayout::Comparison,
        SlideLayout::Timeline,
        SlideLayout::Statistics,
        SlideLayout::Closing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideLayout::TextOnly => "TEXT_ONLY",
            SlideLayout::TitleCover => "TITLE_COVER",
            SlideLayout::TwoColumn => "TWO_COLUMN",
            SlideLayout::ThreeColumn => "THREE_COLUMN",
            SlideLayout::ImageLeft => "IMAGE_LEFT",
            SlideLayout::ImageRight => "IMAGE_RIGHT",
            SlideLayout::ImageBackground => "IMAGE_BACKGROUND",
            SlideLayout::ImageFull => "IMAGE_FULL",
            SlideLayout::BulletList => "BULLET_LIST",
            SlideLayout::Quote => "QUOTE",
            SlideLayout::SectionHeader => "SECTION_HEADER",
            SlideLayout::Comparison => "COMPARISON",
            SlideLayout::Timeline => "TIMELINE",
            SlideLayout::Statistics => "STATISTICS",
            SlideLayout::Closing => "CLOSING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|l| l.as_str() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "LEFT",
            TextAlign::Center => "CENTER",
            TextAlign::Right => "RIGHT",
            TextAlign::Justify => "JUSTIFY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LEFT" => Some(TextAlign::Left),
            "CENTER" => Some(TextAlign::Center),
            "RIGHT" => Some(TextAlign::Right),
            "JUSTIFY" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

//=========================================================================================
// Presentations and Slides
//=========================================================================================

/// A slide deck. Owns its slides; deleting it deletes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// The topic the deck was generated from.
    pub prompt: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub voice_profile_id: Option<Uuid>,
    pub framework_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields needed to create a presentation.
#[derive(Debug, Clone)]
pub struct NewPresentation {
    pub title: String,
    pub description: Option<String>,
    pub prompt: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub voice_profile_id: Option<Uuid>,
    pub framework_id: Option<Uuid>,
}

/// Presentation-level settings written by the editor's settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationSettings {
    pub title: String,
    pub description: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

/// A single slide. `order` is unique within its presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub id: Uuid,
    pub presentation_id: Uuid,
    pub order: i32,
    pub title: String,
    pub content: String,
    pub narration: Option<String>,
    pub annotations: Option<String>,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub heading_color: Option<String>,
    pub text_align: TextAlign,
    pub show_title: bool,
    pub show_content: bool,
}

impl Slide {
    /// Copies every editable field, leaving identity and position behind.
    pub fn to_draft(&self) -> SlideDraft {
        SlideDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            narration: self.narration.clone(),
            annotations: self.annotations.clone(),
            slide_type: self.slide_type,
            layout: self.layout,
            image_url: self.image_url.clone(),
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            heading_color: self.heading_color.clone(),
            text_align: self.text_align,
            show_title: self.show_title,
            show_content: self.show_content,
        }
    }

    /// Overwrites every editable field with `update`.
    pub fn apply_update(&mut self, update: SlideUpdate) {
        let draft = update.0;
        self.title = draft.title;
        self.content = draft.content;
        self.narration = draft.narration;
        self.annotations = draft.annotations;
        self.slide_type = draft.slide_type;
        self.layout = draft.layout;
        self.image_url = draft.image_url;
        self.background_color = draft.background_color;
        self.text_color = draft.text_color;
        self.heading_color = draft.heading_color;
        self.text_align = draft.text_align;
        self.show_title = draft.show_title;
        self.show_content = draft.show_content;
    }

    pub fn apply_colors(&mut self, colors: &SlideColors) {
        self.background_color = Some(colors.background_color.clone());
        self.text_color = Some(colors.text_color.clone());
        self.heading_color = Some(colors.heading_color.clone());
    }
}

/// The editable content of a slide, without identity or position.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDraft {
    pub title: String,
    pub content: String,
    pub narration: Option<String>,
    pub annotations: Option<String>,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub heading_color: Option<String>,
    pub text_align: TextAlign,
    pub show_title: bool,
    pub show_content: bool,
}

impl SlideDraft {
    /// A draft with the editor's defaults for everything but the text.
    pub fn new(title: impl Into<String>, content: impl Into<String>, slide_type: SlideType) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            narration: None,
            annotations: None,
            slide_type,
            layout: slide_type.default_layout(),
            image_url: None,
            background_color: None,
            text_color: None,
            heading_color: None,
            text_align: TextAlign::default(),
            show_title: true,
            show_content: true,
        }
    }

    pub fn into_slide(self, id: Uuid, presentation_id: Uuid, order: i32) -> Slide {
        Slide {
            id,
            presentation_id,
            order,
            title: self.title,
            content: self.content,
            narration: self.narration,
            annotations: self.annotations,
            slide_type: self.slide_type,
            layout: self.layout,
            image_url: self.image_url,
            background_color: self.background_color,
            text_color: self.text_color,
            heading_color: self.heading_color,
            text_align: self.text_align,
            show_title: self.show_title,
            show_content: self.show_content,
        }
    }
}

/// A full-record slide write. Every field is replaced; the last writer wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideUpdate(pub SlideDraft);

/// The three colours a theme controls on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideColors {
    pub background_color: String,
    pub text_color: String,
    pub heading_color: String,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideOrder {
    pub slide_id: Uuid,
    pub order: i32,
}

//=========================================================================================
// Generation Inputs
//=========================================================================================

/// A reusable deck structure whose slides are instructions for the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Framework {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub slides: Vec<FrameworkSlide>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkSlide {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewFramework {
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub slides: Vec<NewFrameworkSlide>,
}

#[derive(Debug, Clone)]
pub struct NewFrameworkSlide {
    pub title: String,
    pub instructions: String,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
}

/// Stylistic preferences injected into every generation prompt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoiceProfile {
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

/// A brainstorm seed that can spawn several presentations.
#[derive(Debug, Clone, PartialEq)]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Generation Outputs
//=========================================================================================

/// A normalized slide produced by the generation pipeline, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSlide {
    pub title: String,
    pub content: String,
    pub narration: Option<String>,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
    pub order: i32,
}

impl GeneratedSlide {
    pub fn into_draft(self) -> SlideDraft {
        let mut draft = SlideDraft::new(self.title, self.content, self.slide_type);
        draft.layout = self.layout;
        draft.narration = self.narration;
        draft
    }
}

/// The four fixed rhetorical structures an idea can be framed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RhetoricalFramework {
    /// Contrarian, useful, bridge.
    Cub,
    /// Problem, agitate, solve, expand.
    Pase,
    /// Hook, empathy, authority, roadmap.
    Hear,
    /// What, why, how.
    Wwh,
}

impl RhetoricalFramework {
    pub const ALL: [RhetoricalFramework; 4] = [
        RhetoricalFramework::Cub,
        RhetoricalFramework::Pase,
        RhetoricalFramework::Hear,
        RhetoricalFramework::Wwh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RhetoricalFramework::Cub => "CUB",
            RhetoricalFramework::Pase => "PASE",
            RhetoricalFramework::Hear => "HEAR",
            RhetoricalFramework::Wwh => "WWH",
        }
    }

    /// The beats a single major point is walked through, in order.
    pub fn beats(&self) -> &'static [&'static str] {
        match self {
            RhetoricalFramework::Cub => &["Contrarian", "Useful", "Bridge"],
            RhetoricalFramework::Pase => &["Problem", "Agitate", "Solve", "Expand"],
            RhetoricalFramework::Hear => &["Hook", "Empathy", "Authority", "Roadmap"],
            RhetoricalFramework::Wwh => &["What", "Why", "How"],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|f| f.name() == upper)
    }
}

/// A candidate framing of an idea, produced per rhetorical framework.
#[derive(Debug, Clone, PartialEq)]
pub struct Angle {
    pub framework: RhetoricalFramework,
    /// The stored framework template with the same name, if one exists.
    pub framework_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub key_points: Vec<String>,
}
