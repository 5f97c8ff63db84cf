//! Runtime module - executes commands and feeds results back
//!
//! - `highlighter` - the `Highlighter` facade: owns the model, runs debounce
//!   timers and background tokenizer workers on threads, and drains their
//!   messages back through `update`

pub mod highlighter;

pub use highlighter::{CacheEvent, Highlighter};
