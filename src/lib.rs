//! Lumen - incremental syntax and semantic highlighting
//!
//! This crate turns document text into per-line classified spans for an
//! editor. Edited lines are highlighted synchronously from the grammar
//! alone; after a quiet interval the whole document is re-tokenized on a
//! worker thread with bracket depths, value overrides and scope-based name
//! classification, and the result is swapped in as one unit.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod output;
pub mod runtime;
pub mod semantic;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EngineConfig;
pub use messages::Msg;
pub use model::{EngineModel, RenderMode, SchedulerPhase};
pub use runtime::{CacheEvent, Highlighter};
pub use syntax::{Category, LineCache, TokenSpan};
pub use theme::Theme;
