//! Syntax tokenization
//!
//! Turns document text into per-line category spans:
//! - Grammar resolution from file names and hints
//! - Tree-sitter backed lexing into `(category, value)` tokens, categorized
//!   by each grammar's highlights query
//! - Bracket depth coloring, value overrides and semantic name refinement
//! - A synchronous per-line fallback for freshly edited lines
//!
//! ## Architecture
//!
//! ```text
//! Document Edit → SyntaxMsg::TextChanged → fallback spans for edited lines
//!              → Cmd::DebouncedTokenize → (debounce timer)
//!              → SyntaxMsg::ParseReady → Cmd::RunTokenize
//!              → (worker thread) → SyntaxMsg::ParseCompleted → cache swap
//! ```

mod brackets;
mod category;
mod fallback;
mod highlights;
mod languages;
mod lexer;
mod queries;
mod style;
mod tokenizer;

pub use brackets::{depth_category, is_bracket, BracketDepth, BRACKET_DEPTHS};
pub use category::Category;
pub use fallback::{highlight_line, highlight_lines};
pub use highlights::{LineCache, LineSplitter, TokenSpan};
pub use languages::{LanguageId, ALL_LANGUAGES};
pub use lexer::{Grammar, Lexer, RawToken};
pub use queries::category_for_capture;
pub use style::{StyleEntry, StyleTable, TextFormat, ValueOverride};
pub use tokenizer::{
    classify_tokens, is_constant_case, tokenize_document, SemanticContext, TokenizeJob,
};
