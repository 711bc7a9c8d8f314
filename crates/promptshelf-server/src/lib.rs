//! PromptShelf server library - HTTP API over the prompt record store.
//!
//! Routes, shared state, configuration and logging live here so integration
//! tests can build the same router as the binary.

pub mod config;
pub mod logging;
pub mod routes;
pub mod state;
