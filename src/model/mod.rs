//! Engine model - the complete state of the highlighter
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod document;
pub mod highlight;

pub use document::Document;
pub use highlight::{HighlightState, RenderMode, SchedulerPhase};

use std::sync::Arc;

use crate::semantic::{ModuleResolver, NoModules};
use crate::syntax::{highlight_line, TextFormat, TokenSpan};
use crate::theme::Theme;

/// The complete engine model
#[derive(Debug)]
pub struct EngineModel {
    pub document: Document,
    pub highlight: HighlightState,
    /// Source of the style table; rebuilt per grammar
    pub theme: Theme,
    /// Finds imported modules for cross-source classification
    pub resolver: Arc<dyn ModuleResolver>,
}

impl EngineModel {
    pub fn new(document: Document, theme: Theme, debounce_ms: u64) -> Self {
        let styles = theme.style_table(document.language());
        let mut highlight = HighlightState::new(styles, debounce_ms);
        highlight.known_lines = document.line_count();

        Self {
            document,
            highlight,
            theme,
            resolver: Arc::new(NoModules),
        }
    }

    /// Spans to render for a line.
    ///
    /// Cached mode serves the cache. Otherwise lines edited since the cache
    /// was built get their fallback spans, untouched lines whose text still
    /// matches the stale cache keep its spans, and anything else is lexed on
    /// demand. Past the end of the document the result is empty.
    pub fn spans_for_line(&self, line: usize) -> Vec<TokenSpan> {
        let Some(text) = self.document.line_text(line) else {
            return Vec::new();
        };

        if self.highlight.mode == RenderMode::Cached {
            if let Some(spans) = self.highlight.cached_line(line) {
                return spans.to_vec();
            }
        }

        if let Some(spans) = self.highlight.fallback.get(&line) {
            return spans.clone();
        }

        if let Some(spans) = self.highlight.cached_line(line) {
            if covers(spans, &text) {
                return spans.to_vec();
            }
        }

        let mut lexer = self.document.grammar.lexer();
        highlight_line(&mut lexer, &text)
    }

    /// Resolved display format for a span
    pub fn format_for(&self, span: &TokenSpan) -> Option<TextFormat> {
        self.highlight.styles.resolve_format(&span.category)
    }
}

/// Whether the spans' texts concatenate to exactly `text`
fn covers(spans: &[TokenSpan], text: &str) -> bool {
    let mut rest = text;
    for span in spans {
        match rest.strip_prefix(span.text.as_str()) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    rest.is_empty()
}
