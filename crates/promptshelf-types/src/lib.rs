//! Shared types for the PromptShelf prompt library.

mod prompt;
mod query;

pub use prompt::*;
pub use query::*;
