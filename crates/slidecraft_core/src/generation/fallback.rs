//! crates/slidecraft_core/src/generation/fallback.rs
//!
//! Degraded but always-available results for when the model cannot be used.

use crate::domain::{GeneratedSlide, Slide, SlideType};

/// Appended to a slide's content when regeneration fails.
pub const REGENERATION_FALLBACK_MARKER: &str =
    "*[AI enhancement unavailable - original content preserved]*";

/// The fixed four-slide skeleton built from the raw topic.
pub fn fallback_slides(topic: &str) -> Vec<GeneratedSlide> {
    let topic = topic.trim();
    let skeleton = [
        (
            topic.to_string(),
            format!("An introduction to {}", topic),
            SlideType::Title,
        ),
        (
            "Overview".to_string(),
            format!(
                "- What {} is\n- Why it matters\n- What we will cover",
                topic
            ),
            SlideType::Intro,
        ),
        (
            "Main Content".to_string(),
            format!(
                "- Key concepts of {}\n- Practical examples\n- Common pitfalls",
                topic
            ),
            SlideType::Content,
        ),
        (
            "Conclusion".to_string(),
            format!("- Summary of {}\n- Key takeaways\n- Questions", topic),
            SlideType::Conclusion,
        ),
    ];

    skeleton
        .into_iter()
        .enumerate()
        .map(|(index, (title, content, slide_type))| GeneratedSlide {
            title,
            content,
            narration: None,
            slide_type,
            layout: slide_type.default_layout(),
            order: index as i32 + 1,
        })
        .collect()
}

/// The original slide, kept whole, with the marker appended to its content.
/// A slide already carrying the marker is returned as is.
pub fn regeneration_fallback(original: &Slide) -> GeneratedSlide {
    let content = if original.content.trim().is_empty() {
        REGENERATION_FALLBACK_MARKER.to_string()
    } else if original.content.trim_end().ends_with(REGENERATION_FALLBACK_MARKER) {
        original.content.clone()
    } else {
        format!("{}\n\n{}", original.content, REGENERATION_FALLBACK_MARKER)
    };
    GeneratedSlide {
        title: original.title.clone(),
        content,
        narration: original.narration.clone(),
        slide_type: original.slide_type,
        layout: original.layout,
        order: original.order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SlideDraft, SlideLayout};
    use uuid::Uuid;

    #[test]
    fn skeleton_has_four_typed_slides() {
        let slides = fallback_slides("  Rust ownership ");
        let types: Vec<SlideType> = slides.iter().map(|s| s.slide_type).collect();
        assert_eq!(
            types,
            vec![SlideType::Title, SlideType::Intro, SlideType::Content, SlideType::Conclusion]
        );
        assert_eq!(slides[0].title, "Rust ownership");
        assert_eq!(slides[0].layout, SlideLayout::TitleCover);
        assert_eq!(
            slides.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn regeneration_fallback_keeps_original() {
        let mut draft = SlideDraft::new("Costs", "Costs went up.", SlideType::Content);
        draft.narration = Some("Explain the chart".into());
        let original = draft.into_slide(Uuid::new_v4(), Uuid::new_v4(), 5);

        let slide = regeneration_fallback(&original);
        assert_eq!(slide.order, 5);
        assert_eq!(slide.title, "Costs");
        assert!(slide.content.starts_with("Costs went up."));
        assert!(slide.content.ends_with(REGENERATION_FALLBACK_MARKER));
        assert_eq!(slide.narration.as_deref(), Some("Explain the chart"));
    }

    #[test]
    fn repeated_failures_append_the_marker_once() {
        let original = SlideDraft::new("Costs", "Costs went up.", SlideType::Content)
            .into_slide(Uuid::new_v4(), Uuid::new_v4(), 2);
        let first = regeneration_fallback(&original);

        let mut again = original.clone();
        again.content = first.content.clone();
        let second = regeneration_fallback(&again);

        assert_eq!(second.content, first.content);
        assert_eq!(second.content.matches(REGENERATION_FALLBACK_MARKER).count(), 1);
    }
}
