mod common;

use common::{harness, new_presentation, seeded_presentation, ScriptedModel};
use slidecraft_core::generation::fallback::REGENERATION_FALLBACK_MARKER;
use slidecraft_core::theme::find_preset;
use slidecraft_core::{
    AddSlide, GeneratePresentation, PortError, PresentationSettings, PresentationStore,
    RhetoricalFramework, SlideColors, SlideLayout, SlideType, SlideUpdate,
};

fn topic(topic: &str) -> GeneratePresentation {
    GeneratePresentation {
        topic: topic.to_string(),
        ..Default::default()
    }
}

//=========================================================================================
// Generation
//=========================================================================================

#[tokio::test]
async fn generate_with_network_error_stores_fallback_skeleton() {
    let model = ScriptedModel::offline();
    let h = harness(model.clone());

    let detail = h.deck.generate_presentation(topic("Rust for Teams")).await.unwrap();

    assert_eq!(model.calls(), 1);
    assert_eq!(detail.presentation.title, "Rust for Teams");
    assert_eq!(detail.presentation.prompt, "Rust for Teams");
    let titles: Vec<&str> = detail.slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Rust for Teams", "Overview", "Main Content", "Conclusion"]);
    let types: Vec<SlideType> = detail.slides.iter().map(|s| s.slide_type).collect();
    assert_eq!(
        types,
        [SlideType::Title, SlideType::Intro, SlideType::Content, SlideType::Conclusion]
    );
    let orders: Vec<i32> = detail.slides.iter().map(|s| s.order).collect();
    assert_eq!(orders, [1, 2, 3, 4]);
}

#[tokio::test]
async fn generate_normalizes_fenced_model_output() {
    let reply = r#"Here is your deck:
```json
{"slides": [
  {"title": "Welcome", "content": "Quarterly results", "order": 1},
  {"title": "Introduction", "content": "Where we stand", "order": 2},
  {"title": "Market Data", "content": ["Revenue up", "Costs down"], "order": 3},
  {"title": "Summary", "content": "Good quarter", "order": 4},
  {"title": "Next Steps", "content": "Hire", "layout": "NOT_A_LAYOUT", "order": 5}
]}
```"#;
    let h = harness(ScriptedModel::replying(reply));

    let detail = h
        .deck
        .generate_presentation(GeneratePresentation {
            topic: "Q3 results".to_string(),
            title: Some("Q3 Review".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(detail.presentation.title, "Q3 Review");
    let types: Vec<SlideType> = detail.slides.iter().map(|s| s.slide_type).collect();
    assert_eq!(
        types,
        [
            SlideType::Title,
            SlideType::Intro,
            SlideType::Content,
            SlideType::Conclusion,
            SlideType::NextSteps
        ]
    );
    assert_eq!(detail.slides[2].content, "- Revenue up\n- Costs down");
    assert_eq!(detail.slides[4].layout, SlideLayout::BulletList);
}

#[tokio::test]
async fn generate_keeps_model_slides_that_contain_code_blocks() {
    let bare = r#"[
  {"title": "Rust", "content": "Why we switched"},
  {"title": "Hello", "content": "```rust\nfn main() {}\n```"},
  {"title": "Summary", "content": "Ship it"}
]"#;
    let fenced = format!("```json\n{}\n```", bare);

    for reply in [bare.to_string(), fenced] {
        let h = harness(ScriptedModel::replying(&reply));

        let detail = h.deck.generate_presentation(topic("Rust")).await.unwrap();

        let titles: Vec<&str> = detail.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Rust", "Hello", "Summary"]);
        assert_eq!(detail.slides[1].content, "```rust\nfn main() {}\n```");
    }
}

#[tokio::test]
async fn generate_requires_a_topic() {
    let model = ScriptedModel::offline();
    let h = harness(model.clone());

    let result = h.deck.generate_presentation(topic("   ")).await;

    assert!(matches!(result, Err(PortError::Invalid(_))));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn regenerate_failure_keeps_content_with_marker() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 2).await;
    let original = h.store.list_slides(presentation.id).await.unwrap()[1].clone();

    let saved = h.deck.regenerate_slide(original.id, None, None).await.unwrap();

    assert_eq!(saved.title, original.title);
    assert_eq!(saved.order, original.order);
    assert_eq!(
        saved.content,
        format!("{}\n\n{}", original.content, REGENERATION_FALLBACK_MARKER)
    );
}

#[tokio::test]
async fn regenerate_keeps_order_and_styling() {
    let reply = r#"{"slide": {"title": "Sharper Title", "content": "Sharper body", "order": 9}}"#;
    let h = harness(ScriptedModel::replying(reply));
    let presentation = seeded_presentation(&h.store, 3).await;
    let original = h.store.list_slides(presentation.id).await.unwrap()[1].clone();

    let saved = h
        .deck
        .regenerate_slide(original.id, Some("Make it punchier".to_string()), None)
        .await
        .unwrap();

    assert_eq!(saved.title, "Sharper Title");
    assert_eq!(saved.content, "Sharper body");
    assert_eq!(saved.order, original.order);
    assert_eq!(saved.slide_type, original.slide_type);
    assert_eq!(saved.background_color, original.background_color);
}

//=========================================================================================
// Themes and Editing
//=========================================================================================

#[tokio::test]
async fn add_slide_takes_colors_from_matching_preset() {
    let h = harness(ScriptedModel::offline());
    let dark = find_preset("dark").unwrap();
    let presentation = h
        .store
        .create_presentation(new_presentation(dark.primary_color, dark.secondary_color), vec![])
        .await
        .unwrap();

    let slide = h.deck.add_slide(presentation.id, AddSlide::default()).await.unwrap();

    assert_eq!(slide.order, 1);
    assert_eq!(slide.background_color.as_deref(), Some(dark.background_color));
    assert_eq!(slide.text_color.as_deref(), Some(dark.text_color));
    assert_eq!(slide.heading_color.as_deref(), Some(dark.heading_color));
}

#[tokio::test]
async fn add_slide_with_unknown_brand_colors_uses_light() {
    let h = harness(ScriptedModel::offline());
    let light = find_preset("light").unwrap();
    let presentation = h
        .store
        .create_presentation(new_presentation("#123456", "#654321"), vec![])
        .await
        .unwrap();

    let slide = h.deck.add_slide(presentation.id, AddSlide::default()).await.unwrap();

    assert_eq!(slide.background_color.as_deref(), Some(light.background_color));
}

#[tokio::test]
async fn apply_theme_to_all_only_touches_colors() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 3).await;
    let before = h.store.list_slides(presentation.id).await.unwrap();
    let colors = SlideColors {
        background_color: "#000000".to_string(),
        text_color: "#EEEEEE".to_string(),
        heading_color: "#FFFFFF".to_string(),
    };

    let updated = h
        .deck
        .apply_theme_to_all(presentation.id, colors.clone())
        .await
        .unwrap();

    assert_eq!(updated, 3);
    let after = h.store.list_slides(presentation.id).await.unwrap();
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(new.background_color.as_deref(), Some("#000000"));
        assert_eq!(new.text_color.as_deref(), Some("#EEEEEE"));
        assert_eq!(new.heading_color.as_deref(), Some("#FFFFFF"));

        let mut expected = old.clone();
        expected.apply_colors(&colors);
        assert_eq!(new, &expected);
    }
}

#[tokio::test]
async fn update_slide_rejects_malformed_annotations() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 1).await;
    let slide = h.store.list_slides(presentation.id).await.unwrap()[0].clone();

    let mut draft = slide.to_draft();
    draft.annotations = Some("{not json".to_string());
    let result = h.deck.update_slide(slide.id, SlideUpdate(draft)).await;

    assert!(matches!(result, Err(PortError::Invalid(_))));
    assert_eq!(h.store.get_slide(slide.id).await.unwrap(), slide);
}

#[tokio::test]
async fn update_slide_with_blank_annotations_clears_the_overlay() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 1).await;
    let slide = h.store.list_slides(presentation.id).await.unwrap()[0].clone();

    let mut draft = slide.to_draft();
    draft.annotations = Some(r#"{"shapes":[],"texts":[]}"#.to_string());
    h.deck.update_slide(slide.id, SlideUpdate(draft.clone())).await.unwrap();

    for blank in ["", "  "] {
        draft.annotations = Some(blank.to_string());
        let saved = h.deck.update_slide(slide.id, SlideUpdate(draft.clone())).await.unwrap();
        assert_eq!(saved.annotations, None);
        assert_eq!(h.store.get_slide(slide.id).await.unwrap().annotations, None);
    }
}

#[tokio::test]
async fn update_settings_rejects_blank_title() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 1).await;

    let result = h
        .deck
        .update_presentation_settings(
            presentation.id,
            PresentationSettings {
                title: " ".to_string(),
                description: None,
                primary_color: presentation.primary_color.clone(),
                secondary_color: presentation.secondary_color.clone(),
                font_family: presentation.font_family.clone(),
            },
        )
        .await;

    assert!(matches!(result, Err(PortError::Invalid(_))));
}

#[tokio::test]
async fn mutations_announce_the_presentation_and_reads_do_not() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 2).await;
    let slides = h.store.list_slides(presentation.id).await.unwrap();

    h.deck.get_presentation(presentation.id).await.unwrap();
    h.deck.list_presentations().await.unwrap();
    assert!(h.notifier.changed().is_empty());

    h.deck.add_slide(presentation.id, AddSlide::default()).await.unwrap();
    h.deck.duplicate_slide(slides[0].id).await.unwrap();
    h.deck.delete_slide(slides[1].id).await.unwrap();
    h.deck.delete_presentation(presentation.id).await.unwrap();

    assert_eq!(h.notifier.changed(), vec![presentation.id; 4]);
}

#[tokio::test]
async fn generated_presentations_are_announced() {
    let h = harness(ScriptedModel::offline());

    let generated = h.deck.generate_presentation(topic("Rust for Teams")).await.unwrap();
    assert_eq!(h.notifier.changed(), vec![generated.presentation.id]);

    let idea = h
        .deck
        .create_idea("Remote onboarding", "Getting new hires productive fast")
        .await
        .unwrap();
    let angle = h.deck.generate_angles(idea.id).await.unwrap().remove(0);
    let expanded = h
        .deck
        .create_presentation_from_angle(idea.id, angle, None)
        .await
        .unwrap();

    assert_eq!(
        h.notifier.changed(),
        vec![generated.presentation.id, expanded.presentation.id]
    );
}

//=========================================================================================
// Ideas and Angles
//=========================================================================================

#[tokio::test]
async fn angles_fall_back_to_one_per_framework() {
    let h = harness(ScriptedModel::offline());
    let idea = h
        .deck
        .create_idea("Remote onboarding", "Getting new hires productive fast")
        .await
        .unwrap();

    let angles = h.deck.generate_angles(idea.id).await.unwrap();

    let frameworks: Vec<RhetoricalFramework> = angles.iter().map(|a| a.framework).collect();
    assert_eq!(frameworks, RhetoricalFramework::ALL);
    assert!(angles.iter().all(|a| !a.title.is_empty() && !a.key_points.is_empty()));
}

#[tokio::test]
async fn expanding_an_angle_persists_outline_when_model_is_down() {
    let h = harness(ScriptedModel::offline());
    let idea = h
        .deck
        .create_idea("Remote onboarding", "Getting new hires productive fast")
        .await
        .unwrap();
    let angle = h.deck.generate_angles(idea.id).await.unwrap().remove(1);

    let detail = h
        .deck
        .create_presentation_from_angle(idea.id, angle.clone(), None)
        .await
        .unwrap();

    assert_eq!(detail.presentation.title, angle.title);
    assert!(detail.slides.len() > 8);
    assert_eq!(detail.slides[0].slide_type, SlideType::Title);
    let orders: Vec<i32> = detail.slides.iter().map(|s| s.order).collect();
    let expected: Vec<i32> = (1..=detail.slides.len() as i32).collect();
    assert_eq!(orders, expected);
}

#[tokio::test]
async fn unknown_idea_is_not_found() {
    let h = harness(ScriptedModel::offline());
    let result = h.deck.generate_angles(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(PortError::NotFound(_))));
}
