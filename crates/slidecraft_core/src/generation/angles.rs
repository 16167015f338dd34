//! crates/slidecraft_core/src/generation/angles.rs
//!
//! Framing an idea through the four rhetorical frameworks, and the fixed deck
//! structure a chosen angle is expanded into.

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    Angle, Framework, GeneratedSlide, Idea, RhetoricalFramework, SlideLayout, SlideType,
};
use crate::generation::normalize::parse_json_payload;

/// Key points beyond this are dropped before expansion.
pub const MAX_KEY_POINTS: usize = 5;

//=========================================================================================
// Angle Parsing
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAngle {
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "key_points", alias = "points")]
    pub key_points: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnglesPayload {
    List(Vec<RawAngle>),
    Wrapped { angles: Vec<RawAngle> },
}

pub fn parse_angles(response: &str) -> Result<Vec<RawAngle>, serde_json::Error> {
    let payload: AnglesPayload = parse_json_payload(response)?;
    Ok(match payload {
        AnglesPayload::List(angles) => angles,
        AnglesPayload::Wrapped { angles } => angles,
    })
}

/// The stored framework template sharing the rhetorical framework's name.
pub fn matching_framework_id(frameworks: &[Framework], framework: RhetoricalFramework) -> Option<Uuid> {
    frameworks
        .iter()
        .find(|f| f.name.trim().eq_ignore_ascii_case(framework.name()))
        .map(|f| f.id)
}

/// Picks one angle per framework, in framework order. Gaps are synthesized.
pub fn select_angles(idea: &Idea, raw: Vec<RawAngle>, frameworks: &[Framework]) -> Vec<Angle> {
    RhetoricalFramework::ALL
        .into_iter()
        .map(|framework| {
            let parsed = raw
                .iter()
                .find(|a| {
                    a.framework.as_deref().and_then(RhetoricalFramework::parse) == Some(framework)
                        && a.title.as_deref().is_some_and(|t| !t.trim().is_empty())
                })
                .map(|a| to_angle(idea, a, framework));
            let mut angle = parsed.unwrap_or_else(|| fallback_angle(idea, framework));
            angle.framework_id = matching_framework_id(frameworks, framework);
            angle
        })
        .collect()
}

fn to_angle(idea: &Idea, raw: &RawAngle, framework: RhetoricalFramework) -> Angle {
    let key_points: Vec<String> = raw
        .key_points
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    let fallback = fallback_angle(idea, framework);
    Angle {
        framework,
        framework_id: None,
        title: raw.title.as_deref().unwrap_or_default().trim().to_string(),
        description: raw
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or(fallback.description),
        key_points: if key_points.is_empty() {
            fallback.key_points
        } else {
            key_points
        },
    }
}

/// An angle built from the idea alone.
pub fn fallback_angle(idea: &Idea, framework: RhetoricalFramework) -> Angle {
    let topic = idea.title.trim();
    let (title, description, key_points) = match framework {
        RhetoricalFramework::Cub => (
            format!("Rethinking {}", topic),
            format!("Challenges the common view of {} and bridges to a more useful approach.", topic),
            vec![
                format!("What most people get wrong about {}", topic),
                format!("A more useful way to approach {}", topic),
                "Bridging from insight to action".to_string(),
            ],
        ),
        RhetoricalFramework::Pase => (
            format!("The {} Problem", topic),
            format!("Names the problem behind {}, shows its cost, and lays out the solution.", topic),
            vec![
                format!("The core problem in {}", topic),
                "Why it keeps getting worse".to_string(),
                "A practical solution".to_string(),
            ],
        ),
        RhetoricalFramework::Hear => (
            format!("{}: A Roadmap", topic),
            format!("Hooks the audience, meets them where they are, and maps the path through {}.", topic),
            vec![
                format!("Where the audience stands on {}", topic),
                "What experience has taught us".to_string(),
                "The road ahead".to_string(),
            ],
        ),
        RhetoricalFramework::Wwh => (
            format!("{}: What, Why and How", topic),
            format!("Explains what {} is, why it matters and how to act on it.", topic),
            vec![
                format!("What {} is", topic),
                format!("Why {} matters", topic),
                format!("How to apply {}", topic),
            ],
        ),
    };
    Angle {
        framework,
        framework_id: None,
        title,
        description,
        key_points,
    }
}

/// One line per framework with its beats, for the angles prompt.
pub fn framework_list() -> String {
    RhetoricalFramework::ALL
        .iter()
        .map(|f| format!("- {}: {}", f.name(), f.beats().join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

//=========================================================================================
// Expansion Blueprint
//=========================================================================================

/// One planned slide of an expanded angle.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintSlide {
    pub title: String,
    pub slide_type: SlideType,
    pub layout: SlideLayout,
    pub instructions: String,
}

impl BlueprintSlide {
    fn new(title: impl Into<String>, slide_type: SlideType, layout: SlideLayout, instructions: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slide_type,
            layout,
            instructions: instructions.into(),
        }
    }
}

fn beat_instructions(beat: &str) -> &'static str {
    match beat {
        "Contrarian" => "Challenge the conventional wisdom about this point.",
        "Useful" => "Give the audience something concrete they can use.",
        "Bridge" => "Connect the insight to the audience's own situation.",
        "Problem" => "State the problem plainly.",
        "Agitate" => "Show what the problem costs and why it gets worse if ignored.",
        "Solve" => "Present the solution and how it works.",
        "Expand" => "Widen the view: further benefits, examples or implications.",
        "Hook" => "Open with a surprising fact, question or story.",
        "Empathy" => "Acknowledge the audience's experience and frustrations.",
        "Authority" => "Back the point with evidence, data or experience.",
        "Roadmap" => "Lay out the concrete steps forward.",
        "What" => "Explain what this point is.",
        "Why" => "Explain why it matters to the audience.",
        "How" => "Explain how to put it into practice.",
        _ => "Develop this beat of the argument.",
    }
}

/// The fixed structure: opening beats, the framework once per key point with
/// transitions between points, then the closing sequence.
pub fn blueprint(angle: &Angle) -> Vec<BlueprintSlide> {
    let points = outline_points(angle);

    let mut slides = vec![
        BlueprintSlide::new(
            angle.title.clone(),
            SlideType::Title,
            SlideLayout::TitleCover,
            "Presentation title with a one-line promise to the audience.",
        ),
        BlueprintSlide::new(
            "Who This Is For",
            SlideType::Intro,
            SlideLayout::TextOnly,
            "Describe the audience and what they will walk away with.",
        ),
        BlueprintSlide::new(
            "Why This Matters Now",
            SlideType::Intro,
            SlideLayout::TextOnly,
            "Explain the urgency and the stakes.",
        ),
        BlueprintSlide::new(
            "The Hook",
            SlideType::Content,
            SlideLayout::Quote,
            "A single striking statement, statistic or story that grabs attention.",
        ),
    ];

    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            slides.push(BlueprintSlide::new(
                format!("Next: {}", point),
                SlideType::Content,
                SlideLayout::SectionHeader,
                format!("Transition from \"{}\" to \"{}\".", points[index - 1], point),
            ));
        }
        for beat in angle.framework.beats() {
            slides.push(BlueprintSlide::new(
                format!("{}: {}", point, beat),
                SlideType::Content,
                SlideLayout::BulletList,
                beat_instructions(beat),
            ));
        }
    }

    slides.extend([
        BlueprintSlide::new(
            "Recap",
            SlideType::Conclusion,
            SlideLayout::TextOnly,
            "Briefly restate each key point.",
        ),
        BlueprintSlide::new(
            "Key Takeaways",
            SlideType::Conclusion,
            SlideLayout::BulletList,
            "Three to five takeaways the audience should remember.",
        ),
        BlueprintSlide::new(
            "Next Steps",
            SlideType::NextSteps,
            SlideLayout::BulletList,
            "Concrete actions the audience can take this week.",
        ),
        BlueprintSlide::new(
            "Thank You & Questions",
            SlideType::NextSteps,
            SlideLayout::Closing,
            "Thank the audience and invite questions.",
        ),
    ]);
    slides
}

/// Numbered outline lines for the expansion prompt.
pub fn render_blueprint(slides: &[BlueprintSlide]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {} (slideType: {}, layout: {}) - {}",
                i + 1,
                s.title,
                s.slide_type.as_str(),
                s.layout.as_str(),
                s.instructions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The key points the outline is built from: blanks dropped, at most
/// `MAX_KEY_POINTS`, and the angle's title when nothing is left.
fn outline_points(angle: &Angle) -> Vec<&str> {
    let mut points: Vec<&str> = angle
        .key_points
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.trim().is_empty())
        .take(MAX_KEY_POINTS)
        .collect();
    if points.is_empty() {
        points.push(angle.title.as_str());
    }
    points
}

pub fn render_key_points(angle: &Angle) -> String {
    outline_points(angle)
        .into_iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The blueprint as finished slides, for when the model is unavailable.
pub fn blueprint_fallback(idea: &Idea, angle: &Angle, slides: &[BlueprintSlide]) -> Vec<GeneratedSlide> {
    slides
        .iter()
        .enumerate()
        .map(|(index, planned)| {
            let content = if index == 0 {
                angle.description.clone()
            } else {
                format!("{}\n\n_{}_", planned.instructions, idea.title.trim())
            };
            GeneratedSlide {
                title: planned.title.clone(),
                content,
                narration: Some(format!("{} {}", planned.instructions, idea.description.trim())),
                slide_type: planned.slide_type,
                layout: planned.layout,
                order: index as i32 + 1,
            }
        })
        .collect()
}
