//! Lexical grammars
//!
//! A grammar turns raw text into a flat stream of `(category, value)` tokens
//! whose values concatenate back to the input exactly. Structural grammars
//! are backed by tree-sitter: the syntax tree is walked leaf by leaf and each
//! leaf takes the category of the innermost highlight capture enclosing it.
//! Leaves no capture covers are classified from their node kind, and the
//! text between leaves (whitespace, newlines) is emitted as `Text`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, QueryCursor, Tree};

use super::category::Category;
use super::languages::LanguageId;
use super::queries::HighlightQuery;

/// One lexed token, borrowing its value from the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub category: Category,
    pub value: &'a str,
}

impl<'a> RawToken<'a> {
    pub fn new(category: Category, value: &'a str) -> Self {
        Self { category, value }
    }
}

/// Characters that delimit rather than operate
const PUNCTUATION: &[&str] = &["(", ")", "[", "]", "{", "}", ",", ";", ":", ".", "::"];

/// A lexical grammar selection
///
/// Cheap to clone and safe to send to a worker thread; parsers are created
/// per [`Lexer`] since tree-sitter parsers are not `Sync`.
#[derive(Clone)]
pub struct Grammar {
    language: LanguageId,
    ts_language: Option<tree_sitter::Language>,
    highlights: Option<Arc<HighlightQuery>>,
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("language", &self.language)
            .field("highlights", &self.highlights.is_some())
            .finish()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::plain_text()
    }
}

impl Grammar {
    /// The generic grammar: every line is a single `Text` token
    pub fn plain_text() -> Self {
        Self {
            language: LanguageId::PlainText,
            ts_language: None,
            highlights: None,
        }
    }

    pub fn for_language(language: LanguageId) -> Self {
        let ts_language: tree_sitter::Language = match language {
            LanguageId::PlainText => return Self::plain_text(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageId::Json => tree_sitter_json::LANGUAGE.into(),
            LanguageId::Toml => tree_sitter_toml_ng::LANGUAGE.into(),
            LanguageId::Yaml => tree_sitter_yaml::language(),
            LanguageId::Markdown => tree_sitter_md::LANGUAGE.into(),
            LanguageId::Html => tree_sitter_html::LANGUAGE.into(),
            LanguageId::Css => tree_sitter_css::LANGUAGE.into(),
            LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
            LanguageId::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            LanguageId::C => tree_sitter_c::LANGUAGE.into(),
            LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
            LanguageId::Bash => tree_sitter_bash::LANGUAGE.into(),
            LanguageId::Scheme => tree_sitter_racket::LANGUAGE.into(),
            LanguageId::Ini => tree_sitter_ini::LANGUAGE.into(),
            LanguageId::Xml => tree_sitter_xml::LANGUAGE_XML.into(),
        };

        let highlights = HighlightQuery::compile(language, &ts_language).map(Arc::new);
        Self {
            language,
            ts_language: Some(ts_language),
            highlights,
        }
    }

    /// Resolve a file name or explicit hint; unknown hints give plain text
    pub fn resolve(hint: &str) -> Self {
        Self::for_language(LanguageId::from_hint(hint))
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Create a lexer with its own parser instance
    pub fn lexer(&self) -> Lexer {
        let parser = self.ts_language.as_ref().and_then(|lang| {
            let mut parser = Parser::new();
            match parser.set_language(lang) {
                Ok(()) => Some(parser),
                Err(e) => {
                    tracing::error!("Failed to set language for {:?}: {}", self.language, e);
                    None
                }
            }
        });

        Lexer {
            language: self.language,
            parser,
            highlights: self.highlights.clone(),
        }
    }

    /// Lex `text` in one go
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<RawToken<'a>> {
        self.lexer().tokenize(text)
    }
}

/// A grammar bound to a parser instance
pub struct Lexer {
    language: LanguageId,
    parser: Option<Parser>,
    highlights: Option<Arc<HighlightQuery>>,
}

impl Lexer {
    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Produce the token stream for `text`
    ///
    /// Never fails: without a usable parser the whole text is one `Text`
    /// token.
    pub fn tokenize<'a>(&mut self, text: &'a str) -> Vec<RawToken<'a>> {
        let Some(parser) = self.parser.as_mut() else {
            return plain_tokens(text);
        };

        match parser.parse(text, None) {
            Some(tree) => {
                let captures = match &self.highlights {
                    Some(highlights) => capture_spans(text, &tree, highlights),
                    None => Vec::new(),
                };
                leaf_tokens(text, &tree, &captures)
            }
            None => {
                tracing::warn!(
                    "Parse failed for {:?}, lexing as plain text",
                    self.language
                );
                plain_tokens(text)
            }
        }
    }
}

fn plain_tokens(text: &str) -> Vec<RawToken<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![RawToken::new(Category::TEXT, text)]
    }
}

/// A captured byte range and its category
#[derive(Debug, Clone, PartialEq, Eq)]
struct CaptureSpan {
    start: usize,
    end: usize,
    category: Category,
}

/// Run the highlights query, returning captures ordered outermost first.
///
/// The first capture for a byte range wins, matching query file order.
fn capture_spans(text: &str, tree: &Tree, highlights: &HighlightQuery) -> Vec<CaptureSpan> {
    let mut spans = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = QueryCursor::new();

    let mut captures = cursor.captures(&highlights.query, tree.root_node(), text.as_bytes());
    while let Some((query_match, capture_idx)) = captures.next() {
        let capture = &query_match.captures[*capture_idx];
        let Some(category) = highlights.category(capture.index) else {
            continue;
        };
        let (start, end) = (capture.node.start_byte(), capture.node.end_byte());
        if start < end && seen.insert((start, end)) {
            spans.push(CaptureSpan {
                start,
                end,
                category: category.clone(),
            });
        }
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    spans
}

/// Innermost enclosing capture for leaves visited in document order
struct Enclosing<'c> {
    spans: &'c [CaptureSpan],
    next: usize,
    open: Vec<&'c CaptureSpan>,
}

impl<'c> Enclosing<'c> {
    fn new(spans: &'c [CaptureSpan]) -> Self {
        Self {
            spans,
            next: 0,
            open: Vec::new(),
        }
    }

    fn category(&mut self, start: usize, end: usize) -> Option<&'c Category> {
        while let Some(span) = self.spans.get(self.next) {
            if span.start > start {
                break;
            }
            self.open.push(span);
            self.next += 1;
        }
        self.open.retain(|span| span.end > start);
        self.open
            .iter()
            .rev()
            .find(|span| span.end >= end)
            .map(|span| &span.category)
    }
}

/// Walk the tree in document order, emitting one token per leaf plus the gaps
fn leaf_tokens<'a>(text: &'a str, tree: &Tree, captures: &[CaptureSpan]) -> Vec<RawToken<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut enclosing = Enclosing::new(captures);
    let mut cursor = tree.walk();

    'walk: loop {
        let node = cursor.node();
        let descend = !is_atomic(node.kind()) && node.child_count() > 0;

        if descend && cursor.goto_first_child() {
            continue;
        }
        if !descend {
            emit_leaf(text, node, &mut pos, &mut enclosing, &mut tokens);
        }

        // Advance to the next sibling, climbing as needed
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    if let Some(rest) = text.get(pos..) {
        if !rest.is_empty() {
            tokens.push(RawToken::new(Category::TEXT, rest));
        }
    }

    tokens
}

fn emit_leaf<'a>(
    text: &'a str,
    node: Node,
    pos: &mut usize,
    enclosing: &mut Enclosing<'_>,
    tokens: &mut Vec<RawToken<'a>>,
) {
    let start = node.start_byte().max(*pos);
    let end = node.end_byte().min(text.len());
    if end <= start {
        // Zero-width (missing) nodes or nodes already covered
        return;
    }

    if start > *pos {
        if let Some(gap) = text.get(*pos..start) {
            tokens.push(RawToken::new(Category::TEXT, gap));
        }
    }

    let Some(value) = text.get(start..end) else {
        return;
    };
    let category = match enclosing.category(start, end) {
        Some(category) if !value.trim().is_empty() => category.clone(),
        _ => classify(node, value),
    };
    tokens.push(RawToken::new(category, value));
    *pos = end;
}

/// Nodes emitted whole even when they have children
fn is_atomic(kind: &str) -> bool {
    (kind.contains("string") && !kind.contains("content"))
        || kind.contains("comment")
        || kind == "char_literal"
}

fn classify(node: Node, value: &str) -> Category {
    if value.trim().is_empty() {
        return Category::TEXT;
    }
    if node.is_error() {
        return Category::ERROR;
    }
    if !node.is_named() {
        return classify_anonymous(value);
    }

    let kind = node.kind();
    match kind {
        k if k.contains("comment") => Category::COMMENT,
        "identifier"
        | "field_identifier"
        | "property_identifier"
        | "shorthand_property_identifier"
        | "type_identifier"
        | "package_identifier"
        | "statement_identifier"
        | "variable_name"
        | "name"
        | "bare_key"
        | "symbol" => Category::NAME,
        "escape_sequence" => Category::STRING_ESCAPE,
        "true" | "false" | "none" | "null" | "nil" | "boolean" | "undefined" => {
            Category::KEYWORD_CONSTANT
        }
        "self" | "this" | "super" => Category::NAME_BUILTIN_PSEUDO,
        "primitive_type" | "predefined_type" | "integral_type" | "floating_point_type"
        | "boolean_type" | "void_type" | "sized_type_specifier" => Category::KEYWORD_TYPE,
        "tag_name" => Category::NAME_TAG,
        "attribute_name" => Category::NAME_ATTRIBUTE,
        k if is_atomic(k) => Category::STRING,
        k if is_numeric(k) => Category::NUMBER,
        _ => Category::TEXT,
    }
}

fn is_numeric(kind: &str) -> bool {
    matches!(kind, "integer" | "float" | "number")
        || (kind.ends_with("_literal")
            && ["int", "float", "number", "imaginary"]
                .iter()
                .any(|part| kind.contains(part)))
}

fn classify_anonymous(value: &str) -> Category {
    if PUNCTUATION.contains(&value) {
        return Category::PUNCTUATION;
    }
    match value.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => Category::KEYWORD,
        _ => Category::OPERATOR,
    }
}
