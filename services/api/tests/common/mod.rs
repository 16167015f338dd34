//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use api_lib::adapters::InMemoryStore;
use async_trait::async_trait;
use slidecraft_core::{
    ChangeNotifier, CompletionRequest, DeckService, GenerationPipeline, LanguageModelService,
    NewPresentation, PortError, PortResult, Presentation, PresentationStore, SlideDraft, SlideType,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Replies to every completion with the same canned outcome.
pub struct ScriptedModel {
    reply: Result<String, String>,
    calls: Mutex<usize>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(0),
        })
    }

    /// Simulates the model being unreachable.
    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("connection refused".to_string()),
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LanguageModelService for ScriptedModel {
    async fn complete(&self, _request: CompletionRequest) -> PortResult<String> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone().map_err(PortError::Unexpected)
    }
}

/// Remembers every presentation it was told about, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    changed: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    pub fn changed(&self) -> Vec<Uuid> {
        self.changed.lock().unwrap().clone()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn presentation_changed(&self, presentation_id: Uuid) {
        self.changed.lock().unwrap().push(presentation_id);
    }
}

pub struct Harness {
    pub deck: DeckService,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(model: Arc<ScriptedModel>) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let deck = DeckService::new(
        store.clone(),
        GenerationPipeline::new(model),
        notifier.clone(),
    );
    Harness {
        deck,
        store,
        notifier,
    }
}

pub fn new_presentation(primary_color: &str, secondary_color: &str) -> NewPresentation {
    NewPresentation {
        title: "Quarterly Review".to_string(),
        description: None,
        prompt: "Quarterly review".to_string(),
        primary_color: primary_color.to_string(),
        secondary_color: secondary_color.to_string(),
        font_family: "Inter".to_string(),
        voice_profile_id: None,
        framework_id: None,
    }
}

/// Stores a light-themed presentation with slides titled `A`, `B`, ... at orders 1..=count.
pub async fn seeded_presentation(store: &InMemoryStore, count: usize) -> Presentation {
    let drafts = (0..count)
        .map(|i| {
            let title = ((b'A' + i as u8) as char).to_string();
            SlideDraft::new(title, format!("Body {}", i + 1), SlideType::Content)
        })
        .collect();
    store
        .create_presentation(new_presentation("#3B82F6", "#1E40AF"), drafts)
        .await
        .unwrap()
}

pub async fn titles_in_order(store: &InMemoryStore, presentation_id: Uuid) -> Vec<String> {
    store
        .list_slides(presentation_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect()
}

pub async fn orders(store: &InMemoryStore, presentation_id: Uuid) -> Vec<i32> {
    store
        .list_slides(presentation_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.order)
        .collect()
}
