mod common;

use common::{harness, orders, seeded_presentation, titles_in_order, ScriptedModel};
use slidecraft_core::ordering::is_contiguous;
use slidecraft_core::{AddSlide, PortError, PresentationStore, SlideOrder};
use uuid::Uuid;

fn add_at(title: &str, position: Option<i32>) -> AddSlide {
    AddSlide {
        title: Some(title.to_string()),
        position,
        ..Default::default()
    }
}

#[tokio::test]
async fn insert_at_two_places_new_slide_second() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 3).await;

    let added = h
        .deck
        .add_slide(presentation.id, add_at("New", Some(2)))
        .await
        .unwrap();

    assert_eq!(added.order, 2);
    assert_eq!(titles_in_order(&h.store, presentation.id).await, ["A", "New", "B", "C"]);
    assert_eq!(orders(&h.store, presentation.id).await, [1, 2, 3, 4]);
}

#[tokio::test]
async fn add_without_position_appends() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 2).await;

    let added = h.deck.add_slide(presentation.id, AddSlide::default()).await.unwrap();

    assert_eq!(added.order, 3);
    assert_eq!(added.title, "New Slide");
}

#[tokio::test]
async fn position_below_one_is_rejected_and_past_end_is_clamped() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 2).await;

    let rejected = h.deck.add_slide(presentation.id, add_at("X", Some(0))).await;
    assert!(matches!(rejected, Err(PortError::Invalid(_))));

    let clamped = h
        .deck
        .add_slide(presentation.id, add_at("Last", Some(40)))
        .await
        .unwrap();
    assert_eq!(clamped.order, 3);
    assert_eq!(orders(&h.store, presentation.id).await, [1, 2, 3]);
}

#[tokio::test]
async fn duplicate_copies_every_field_and_shifts_followers() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 3).await;
    let source = h.store.list_slides(presentation.id).await.unwrap()[0].clone();

    let mut edited = source.to_draft();
    edited.narration = Some("Say hello".to_string());
    edited.annotations = Some(r#"{"shapes":[],"texts":[]}"#.to_string());
    edited.show_content = false;
    h.deck
        .update_slide(source.id, slidecraft_core::SlideUpdate(edited))
        .await
        .unwrap();
    let source = h.store.get_slide(source.id).await.unwrap();

    let copy = h.deck.duplicate_slide(source.id).await.unwrap();

    assert_ne!(copy.id, source.id);
    assert_eq!(copy.order, source.order + 1);
    assert_eq!(copy.to_draft(), source.to_draft());
    assert_eq!(titles_in_order(&h.store, presentation.id).await, ["A", "A", "B", "C"]);
    assert_eq!(orders(&h.store, presentation.id).await, [1, 2, 3, 4]);
}

#[tokio::test]
async fn inserts_and_duplicates_keep_orders_contiguous() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 1).await;

    for step in 0..6 {
        let slides = h.store.list_slides(presentation.id).await.unwrap();
        if step % 2 == 0 {
            h.deck
                .add_slide(presentation.id, add_at("Inserted", Some(1)))
                .await
                .unwrap();
        } else {
            h.deck.duplicate_slide(slides[slides.len() / 2].id).await.unwrap();
        }
        let after = h.store.list_slides(presentation.id).await.unwrap();
        assert!(is_contiguous(&after), "orders not contiguous after step {}", step);
    }
    assert_eq!(h.store.list_slides(presentation.id).await.unwrap().len(), 7);
}

#[tokio::test]
async fn delete_leaves_gap_and_later_insert_shifts_only_followers() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 4).await;
    let slides = h.store.list_slides(presentation.id).await.unwrap();

    h.deck.delete_slide(slides[1].id).await.unwrap();
    assert_eq!(orders(&h.store, presentation.id).await, [1, 3, 4]);

    h.deck
        .add_slide(presentation.id, add_at("New", Some(3)))
        .await
        .unwrap();

    assert_eq!(titles_in_order(&h.store, presentation.id).await, ["A", "New", "C", "D"]);
    assert_eq!(orders(&h.store, presentation.id).await, [1, 3, 4, 5]);
}

#[tokio::test]
async fn reorder_applies_new_positions() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 3).await;
    let slides = h.store.list_slides(presentation.id).await.unwrap();

    let reversed = slides
        .iter()
        .map(|s| SlideOrder {
            slide_id: s.id,
            order: 4 - s.order,
        })
        .collect();
    h.deck.reorder_slides(presentation.id, reversed).await.unwrap();

    assert_eq!(titles_in_order(&h.store, presentation.id).await, ["C", "B", "A"]);
    assert_eq!(h.notifier.changed(), vec![presentation.id]);
}

#[tokio::test]
async fn reorder_with_foreign_slide_changes_nothing() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 3).await;
    let other = seeded_presentation(&h.store, 1).await;
    let slides = h.store.list_slides(presentation.id).await.unwrap();
    let foreign = h.store.list_slides(other.id).await.unwrap()[0].id;

    let result = h
        .deck
        .reorder_slides(
            presentation.id,
            vec![
                SlideOrder { slide_id: slides[0].id, order: 3 },
                SlideOrder { slide_id: slides[2].id, order: 1 },
                SlideOrder { slide_id: foreign, order: 2 },
            ],
        )
        .await;

    assert!(matches!(result, Err(PortError::NotFound(_))));
    assert_eq!(h.store.list_slides(presentation.id).await.unwrap(), slides);
    assert!(h.notifier.changed().is_empty());
}

#[tokio::test]
async fn reorder_rejects_orders_below_one() {
    let h = harness(ScriptedModel::offline());
    let presentation = seeded_presentation(&h.store, 2).await;
    let slides = h.store.list_slides(presentation.id).await.unwrap();

    let result = h
        .deck
        .reorder_slides(
            presentation.id,
            vec![SlideOrder { slide_id: slides[0].id, order: 0 }],
        )
        .await;

    assert!(matches!(result, Err(PortError::Invalid(_))));
}

#[tokio::test]
async fn missing_slide_is_not_found() {
    let h = harness(ScriptedModel::offline());
    assert!(matches!(
        h.deck.duplicate_slide(Uuid::new_v4()).await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        h.deck.delete_slide(Uuid::new_v4()).await,
        Err(PortError::NotFound(_))
    ));
}
