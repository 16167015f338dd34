//! crates/slidecraft_core/src/generation/normalize.rs
//!
//! Parsing of model responses and normalization of the slides they contain.
//!
//! The model's JSON is loosely typed. Unknown or missing enum values are not
//! errors: they are mapped to documented defaults here, in one place.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{GeneratedSlide, SlideLayout, SlideType};

/// A slide as the model wrote it. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlide {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, alias = "speakerNotes", alias = "notes")]
    pub narration: Option<String>,
    #[serde(default, alias = "slide_type", alias = "type")]
    pub slide_type: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl RawSlide {
    fn has_body(&self) -> bool {
        self.title.is_some() || self.content.as_ref().is_some_and(|c| !c.is_null())
    }
}

impl From<GeneratedSlide> for RawSlide {
    fn from(slide: GeneratedSlide) -> Self {
        RawSlide {
            title: Some(slide.title),
            content: Some(Value::String(slide.content)),
            narration: slide.narration,
            slide_type: Some(slide.slide_type.as_str().to_string()),
            layout: Some(slide.layout.as_str().to_string()),
            order: Some(slide.order as i64),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlidesPayload {
    List(Vec<RawSlide>),
    Wrapped { slides: Vec<RawSlide> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SingleSlidePayload {
    Wrapped { slide: RawSlide },
    List(Vec<RawSlide>),
    Bare(RawSlide),
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        // Greedy body: spans from the first opening fence to the last closing one.
        Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n(.*)```").expect("fence pattern is a valid regex")
    })
}

fn fenced_body(response: &str) -> Option<&str> {
    fence_regex()
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|inner| inner.as_str().trim())
}

/// Parses the model's reply as JSON. A reply that is not JSON on its own is
/// retried with the body of its surrounding code fence.
pub fn parse_json_payload<T: DeserializeOwned>(response: &str) -> Result<T, serde_json::Error> {
    match serde_json::from_str(response.trim()) {
        Ok(payload) => Ok(payload),
        Err(direct) => match fenced_body(response) {
            Some(body) => serde_json::from_str(body),
            None => Err(direct),
        },
    }
}

/// Parses a deck response: a bare array, or an object with a `slides` array.
pub fn parse_slides(response: &str) -> Result<Vec<RawSlide>, serde_json::Error> {
    let payload: SlidesPayload = parse_json_payload(response)?;
    Ok(match payload {
        SlidesPayload::List(slides) => slides,
        SlidesPayload::Wrapped { slides } => slides,
    })
}

/// Parses a single-slide response. `None` when the payload holds no slide:
/// an empty list, or an object with neither a title nor content.
pub fn parse_single_slide(response: &str) -> Result<Option<RawSlide>, serde_json::Error> {
    let payload: SingleSlidePayload = parse_json_payload(response)?;
    let slide = match payload {
        SingleSlidePayload::Wrapped { slide } => Some(slide),
        SingleSlidePayload::List(slides) => slides.into_iter().next(),
        SingleSlidePayload::Bare(slide) => Some(slide),
    };
    Ok(slide.filter(RawSlide::has_body))
}

/// Flattens the model's content into markdown. Bullet arrays become a list.
pub fn content_to_markdown(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => format!("- {}", text.trim()),
                other => format!("- {}", other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => other.to_string(),
    }
}

/// Guesses a slide's role from where it sits and what its title says.
pub fn infer_slide_type(index: usize, total: usize, title: &str) -> SlideType {
    let title = title.to_lowercase();
    let is_last = index + 1 == total;
    let near_end = index + 2 >= total;

    if index == 0 {
        SlideType::Title
    } else if index <= 2 && title.contains("intro") {
        SlideType::Intro
    } else if near_end && (title.contains("conclusion") || title.contains("summary")) {
        SlideType::Conclusion
    } else if is_last || title.contains("next") || title.contains("action") {
        SlideType::NextSteps
    } else {
        SlideType::Content
    }
}

/// Fills in every missing or invalid field. Running it on its own output is a no-op.
pub fn normalize_slides(raw: Vec<RawSlide>) -> Vec<GeneratedSlide> {
    let total = raw.len();
    raw.into_iter()
        .enumerate()
        .map(|(index, slide)| normalize_slide(slide, index, total))
        .collect()
}

fn normalize_slide(raw: RawSlide, index: usize, total: usize) -> GeneratedSlide {
    let order = raw
        .order
        .filter(|o| *o > 0)
        .and_then(|o| i32::try_from(o).ok())
        .unwrap_or(index as i32 + 1);

    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Slide {}", order));

    let slide_type = raw
        .slide_type
        .as_deref()
        .and_then(SlideType::parse)
        .unwrap_or_else(|| infer_slide_type(index, total, &title));

    let layout = raw
        .layout
        .as_deref()
        .and_then(SlideLayout::parse)
        .unwrap_or_else(|| slide_type.default_layout());

    let narration = raw
        .narration
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    GeneratedSlide {
        title,
        content: content_to_markdown(raw.content.as_ref()),
        narration,
        slide_type,
        layout,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_payload_is_unwrapped() {
        let response = "Here you go:\n```json\n[{\"title\": \"A\"}]\n```\nEnjoy!";
        assert_eq!(parse_slides(response).unwrap()[0].title.as_deref(), Some("A"));
        assert_eq!(parse_json_payload::<Vec<i32>>("  [1, 2] ").unwrap(), vec![1, 2]);
        assert_eq!(parse_json_payload::<Value>("```\n{}\n```").unwrap(), serde_json::json!({}));
        assert!(parse_json_payload::<Value>("```json\nnope\n```").is_err());
    }

    #[test]
    fn code_blocks_inside_slide_content_survive() {
        let bare = r#"[{"title": "Intro"}, {"title": "Code", "content": "```rust\nfn main() {}\n```"}]"#;
        let slides = parse_slides(bare).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(
            content_to_markdown(slides[1].content.as_ref()),
            "```rust\nfn main() {}\n```"
        );

        let fenced = format!("```json\n{}\n```", bare);
        let slides = parse_slides(&fenced).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title.as_deref(), Some("Code"));
    }

    #[test]
    fn parses_bare_and_wrapped_arrays() {
        let bare = parse_slides(r#"[{"title": "One"}, {"title": "Two"}]"#).unwrap();
        assert_eq!(bare.len(), 2);
        let wrapped = parse_slides(r#"{"slides": [{"title": "One", "slide_type": "INTRO"}]}"#).unwrap();
        assert_eq!(wrapped[0].slide_type.as_deref(), Some("INTRO"));
        assert!(parse_slides("not json").is_err());
    }

    #[test]
    fn single_slide_accepts_common_shapes() {
        let bare = parse_single_slide(r#"{"title": "A", "content": "x"}"#).unwrap().unwrap();
        assert_eq!(bare.title.as_deref(), Some("A"));
        let wrapped = parse_single_slide(r#"{"slide": {"title": "B"}}"#).unwrap().unwrap();
        assert_eq!(wrapped.title.as_deref(), Some("B"));
        let listed = parse_single_slide(r#"[{"title": "C"}]"#).unwrap().unwrap();
        assert_eq!(listed.title.as_deref(), Some("C"));
        assert!(parse_single_slide("[]").unwrap().is_none());
    }

    #[test]
    fn object_without_title_or_content_is_no_slide() {
        assert!(parse_single_slide(r#"{"error": "content policy"}"#).unwrap().is_none());
        assert!(parse_single_slide("{}").unwrap().is_none());
        assert!(parse_single_slide(r#"{"slide": {"content": null}}"#).unwrap().is_none());
        let content_only = parse_single_slide(r#"{"content": ["a"]}"#).unwrap();
        assert!(content_only.is_some());
    }

    #[test]
    fn missing_fields_get_positional_defaults() {
        let raw = parse_slides(
            r#"[
                {"title": "Welcome"},
                {"title": "Introduction to the problem"},
                {"title": "The data", "content": ["Point one", "Point two"]},
                {"title": "What we learned", "slideType": "bogus", "layout": "HOLOGRAM"},
                {"title": "Summary"},
                {"title": "Thanks"}
            ]"#,
        )
        .unwrap();
        let slides = normalize_slides(raw);

        let types: Vec<SlideType> = slides.iter().map(|s| s.slide_type).collect();
        assert_eq!(
            types,
            vec![
                SlideType::Title,
                SlideType::Intro,
                SlideType::Content,
                SlideType::Content,
                SlideType::Conclusion,
                SlideType::NextSteps,
            ]
        );
        let orders: Vec<i32> = slides.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(slides[0].layout, SlideLayout::TitleCover);
        assert_eq!(slides[3].layout, SlideLayout::BulletList);
        assert_eq!(slides[2].content, "- Point one\n- Point two");
    }

    #[test]
    fn valid_values_are_kept() {
        let raw = parse_slides(
            r#"[{"title": "Cover", "slideType": "next steps", "layout": "quote", "order": 7}]"#,
        )
        .unwrap();
        let slide = &normalize_slides(raw)[0];
        assert_eq!(slide.slide_type, SlideType::NextSteps);
        assert_eq!(slide.layout, SlideLayout::Quote);
        assert_eq!(slide.order, 7);
    }

    #[test]
    fn action_titles_become_next_steps() {
        assert_eq!(infer_slide_type(3, 8, "Action items"), SlideType::NextSteps);
        assert_eq!(infer_slide_type(3, 8, "Introduction"), SlideType::Content);
        assert_eq!(infer_slide_type(2, 8, "Conclusion"), SlideType::Content);
        assert_eq!(infer_slide_type(6, 8, "Conclusion"), SlideType::Conclusion);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = parse_slides(
            r#"[{"title": " "}, {"content": "x", "narration": "  "}, {"title": "Next", "order": 0}]"#,
        )
        .unwrap();
        let once = normalize_slides(raw);
        let twice = normalize_slides(once.iter().cloned().map(RawSlide::from).collect());
        assert_eq!(once, twice);
        assert_eq!(once[0].title, "Slide 1");
        assert_eq!(once[1].narration, None);
        assert_eq!(once[2].order, 3);
    }
}
