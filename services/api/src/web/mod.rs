pub mod catalog;
pub mod dto;
pub mod envelope;
pub mod events;
pub mod presentations;
pub mod rest;
pub mod slides;
pub mod state;
pub mod themes;

// Re-export what the binaries need to build the web server.
pub use events::InvalidationBus;
pub use rest::{router, ApiDoc};
pub use state::AppState;
