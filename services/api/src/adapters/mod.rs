pub mod db;
pub mod llm;
pub mod memory;

pub use db::DbAdapter;
pub use llm::{OpenAiChatAdapter, UnconfiguredModel};
pub use memory::InMemoryStore;
