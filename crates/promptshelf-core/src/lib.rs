//! Prompt record store for PromptShelf.
//!
//! Owns the prompt collection, its version history and usage counters,
//! and mirrors every change to durable storage.

mod error;
pub mod search;
mod storage;
mod store;
mod version;

pub use error::{ErrorKind, PromptShelfError};
pub use search::parse_tag_filter;
pub use storage::{JsonFileStorage, MemoryStorage, PromptStorage};
pub use store::PromptStore;
pub use version::VersionClock;

/// Result type for PromptShelf operations.
pub type Result<T> = std::result::Result<T, PromptShelfError>;
