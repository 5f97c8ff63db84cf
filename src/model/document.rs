//! Document model - the text buffer and grammar selection

use std::path::PathBuf;

use ropey::Rope;

use crate::syntax::{Grammar, LanguageId};

/// The text being highlighted
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for in-memory text)
    pub file_path: Option<PathBuf>,
    /// Selected lexical grammar
    pub grammar: Grammar,
    /// Incremented on every change notification; background results are
    /// matched against it
    pub revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty plain text document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            grammar: Grammar::plain_text(),
            revision: 0,
        }
    }

    /// Load a document from a file path, picking the grammar from its name
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        let grammar = Grammar::for_language(LanguageId::from_path(&path));
        Ok(Self {
            buffer: Rope::from(content),
            file_path: Some(path),
            grammar,
            revision: 0,
        })
    }

    pub fn language(&self) -> LanguageId {
        self.grammar.language()
    }

    /// Number of lines (a trailing newline starts an empty last line)
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Text of a line without its line break, or `None` past the end
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.buffer.len_lines() {
            return None;
        }
        let mut text = self.buffer.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Immutable snapshot of the full text
    pub fn snapshot(&self) -> std::sync::Arc<str> {
        std::sync::Arc::from(self.buffer.to_string())
    }

    /// Replace `chars_removed` characters at `position` with `text`.
    ///
    /// Positions are clamped to the buffer. Returns the number of characters
    /// actually removed.
    pub fn replace(&mut self, position: usize, chars_removed: usize, text: &str) -> usize {
        let len = self.buffer.len_chars();
        let start = position.min(len);
        let end = start.saturating_add(chars_removed).min(len);
        if end > start {
            self.buffer.remove(start..end);
        }
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }
        end - start
    }

    /// Inclusive range of lines covering `chars` characters from `position`
    pub fn line_range(&self, position: usize, chars: usize) -> (usize, usize) {
        let len = self.buffer.len_chars();
        let start = position.min(len);
        let end = start.saturating_add(chars).min(len);
        (self.buffer.char_to_line(start), self.buffer.char_to_line(end))
    }
}
