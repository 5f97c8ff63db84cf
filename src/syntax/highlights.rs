//! Highlight data structures
//!
//! Defines token spans, the line-indexed cache the tokenizer produces, and
//! the splitter that turns a classified token stream into per-line spans.

use serde::Serialize;

use super::category::Category;
use super::languages::LanguageId;

/// A classified run of text within one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub category: Category,
    pub text: String,
    /// Start column (0-indexed, in characters)
    pub start: usize,
}

impl TokenSpan {
    pub fn new(category: Category, text: impl Into<String>, start: usize) -> Self {
        Self {
            category,
            text: text.into(),
            start,
        }
    }

    /// End column (exclusive, in characters)
    pub fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }
}

/// Accumulates classified tokens into lines, splitting values on `\n`.
///
/// Offsets restart at zero on every line and empty pieces are dropped, so
/// each line's spans concatenate to exactly that line's text.
#[derive(Debug, Default)]
pub struct LineSplitter {
    lines: Vec<Vec<TokenSpan>>,
    current: Vec<TokenSpan>,
    offset: usize,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: &Category, value: &str) {
        let mut pieces = value.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                self.current
                    .push(TokenSpan::new(category.clone(), piece, self.offset));
                self.offset += piece.chars().count();
            }
            if pieces.peek().is_some() {
                self.lines.push(std::mem::take(&mut self.current));
                self.offset = 0;
            }
        }
    }

    /// Number of the line currently being filled
    pub fn line(&self) -> usize {
        self.lines.len()
    }

    pub fn finish(mut self) -> Vec<Vec<TokenSpan>> {
        self.lines.push(self.current);
        self.lines
    }
}

/// Immutable per-line span table for a whole document.
///
/// Built wholesale by one tokenizer run and replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineCache {
    lines: Vec<Vec<TokenSpan>>,
    generation: u64,
    revision: u64,
    #[serde(skip)]
    language: LanguageId,
}

impl LineCache {
    pub fn new(
        lines: Vec<Vec<TokenSpan>>,
        language: LanguageId,
        generation: u64,
        revision: u64,
    ) -> Self {
        Self {
            lines,
            generation,
            revision,
            language,
        }
    }

    /// Spans for a line, or an empty slice past the end
    pub fn line(&self, line: usize) -> &[TokenSpan] {
        self.lines.get(line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lines(&self) -> &[Vec<TokenSpan>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The text a line's spans cover
    pub fn line_text(&self, line: usize) -> String {
        self.line(line).iter().map(|s| s.text.as_str()).collect()
    }

    /// The tokenizer launch that produced this cache
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Document revision the snapshot was taken at
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Category at a column, if any span covers it
    pub fn category_at(&self, line: usize, col: usize) -> Option<&Category> {
        self.line(line)
            .iter()
            .take_while(|span| span.start <= col)
            .find(|span| col < span.end())
            .map(|span| &span.category)
    }

    /// Whether two caches hold the same spans, ignoring generation tags
    pub fn same_spans(&self, other: &LineCache) -> bool {
        self.lines == other.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splitter_breaks_on_newlines() {
        let mut splitter = LineSplitter::new();
        splitter.push(&Category::KEYWORD, "def");
        splitter.push(&Category::TEXT, " ");
        splitter.push(&Category::NAME, "f");
        splitter.push(&Category::TEXT, "\n\n  ");
        splitter.push(&Category::STRING, "'a\nb'");
        let lines = splitter.finish();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            vec![
                TokenSpan::new(Category::KEYWORD, "def", 0),
                TokenSpan::new(Category::TEXT, " ", 3),
                TokenSpan::new(Category::NAME, "f", 4),
            ]
        );
        assert!(lines[1].is_empty());
        assert_eq!(
            lines[2],
            vec![
                TokenSpan::new(Category::TEXT, "  ", 0),
                TokenSpan::new(Category::STRING, "'a", 2),
            ]
        );
        assert_eq!(lines[3], vec![TokenSpan::new(Category::STRING, "b'", 0)]);
    }

    #[test]
    fn test_offsets_count_characters() {
        let mut splitter = LineSplitter::new();
        splitter.push(&Category::STRING, "'héllo'");
        splitter.push(&Category::TEXT, " ");
        let lines = splitter.finish();
        assert_eq!(lines[0][1].start, 7);
        assert_eq!(lines[0][0].end(), 7);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let mut splitter = LineSplitter::new();
        splitter.push(&Category::TEXT, "a\n");
        assert_eq!(splitter.line(), 1);
        let lines = splitter.finish();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].is_empty());
    }

    #[test]
    fn test_category_at() {
        let cache = LineCache::new(
            vec![vec![
                TokenSpan::new(Category::KEYWORD, "def", 0),
                TokenSpan::new(Category::TEXT, " ", 3),
                TokenSpan::new(Category::NAME, "f", 4),
            ]],
            LanguageId::Python,
            1,
            0,
        );

        assert_eq!(cache.category_at(0, 2), Some(&Category::KEYWORD));
        assert_eq!(cache.category_at(0, 4), Some(&Category::NAME));
        assert_eq!(cache.category_at(0, 5), None);
        assert_eq!(cache.category_at(7, 0), None);
        assert_eq!(cache.line_text(0), "def f");
    }
}
