//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::web::events::InvalidationBus;
use slidecraft_core::DeckService;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub deck: DeckService,
    /// The same bus `deck` publishes to; `/events` subscribes here.
    pub events: InvalidationBus,
}
