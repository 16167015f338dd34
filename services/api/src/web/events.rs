//! services/api/src/web/events.rs
//!
//! The cache invalidation signal. Core operations announce changed presentations
//! through `ChangeNotifier`; this bus fans them out to every `/events` subscriber
//! as Server-Sent Events.

use crate::web::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Serialize;
use slidecraft_core::ports::ChangeNotifier;
use std::{convert::Infallible, sync::Arc};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// Tells clients that the cached view at `path` is stale.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invalidation {
    pub presentation_id: Uuid,
    pub path: String,
}

impl Invalidation {
    pub fn for_presentation(presentation_id: Uuid) -> Self {
        Self {
            presentation_id,
            path: format!("/presentations/{}", presentation_id),
        }
    }
}

#[derive(Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }
}

impl ChangeNotifier for InvalidationBus {
    fn presentation_changed(&self, presentation_id: Uuid) {
        // No subscribers is the normal case when no editor is open.
        if self.sender.send(Invalidation::for_presentation(presentation_id)).is_err() {
            debug!("No listeners for invalidation of {}", presentation_id);
        }
    }
}

/// Stream cache invalidations.
///
/// Each event is named `invalidate` and carries an `Invalidation` as JSON.
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "A text/event-stream of invalidations", body = Invalidation, content_type = "text/event-stream")
    )
)]
pub async fn events_handler(
    State(app_state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut receiver = app_state.events.subscribe();

    let stream = async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(invalidation) => match Event::default().event("invalidate").json_data(&invalidation) {
                    Ok(event) => {
                        yield Ok::<_, Infallible>(event);
                    }
                    Err(e) => warn!("Failed to encode invalidation: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, {} invalidations dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
