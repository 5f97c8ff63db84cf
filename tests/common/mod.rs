//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use lumen::semantic::NoModules;
use lumen::syntax::{tokenize_document, Grammar, LanguageId, LineCache, SemanticContext};
use lumen::theme::Theme;
use lumen::TokenSpan;

/// Generous bound for background runs in tests
pub const WAIT: Duration = Duration::from_secs(10);

/// Python source exercising classes, functions, imports and brackets
pub const PYTHON_SAMPLE: &str = r#"import os
from collections import OrderedDict as OD

MAX_ITEMS = 10


class Store:
    def __init__(self, path):
        self.path = path
        self.items = OD()

    def add(self, key, value=None):
        if len(self.items) >= MAX_ITEMS:
            raise ValueError("full: %s" % (key,))
        self.items[key] = [value, {"at": os.getpid()}]


def main():
    store = Store("/tmp")
    store.add("a", 1)
"#;

/// Tokenize Python text with scope analysis and no imports resolved
pub fn python_cache(text: &str) -> LineCache {
    let grammar = Grammar::for_language(LanguageId::Python);
    let styles = Theme::default_dark().style_table(LanguageId::Python);
    let semantics = SemanticContext::build(text, &NoModules);
    tokenize_document(text, &grammar, &styles, Some(&semantics), 1, 0)
}

/// Concatenated span texts of a line
pub fn joined(spans: &[TokenSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Assert the spans of every line cover the text exactly, in order
pub fn assert_covers(cache: &LineCache, text: &str) {
    let expected: Vec<&str> = text.split('\n').collect();
    assert_eq!(cache.line_count(), expected.len(), "line count");

    for (n, line) in expected.iter().enumerate() {
        let spans = cache.line(n);
        assert_eq!(joined(spans), *line, "coverage of line {}", n);

        let mut col = 0;
        for span in spans {
            assert_eq!(span.start, col, "offset on line {}: {:?}", n, span);
            assert!(!span.text.is_empty(), "empty span on line {}", n);
            col = span.end();
        }
    }
}

/// Write `content` to `dir/relative`, creating parent directories
pub fn write_module(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
