//! Tree-sitter highlight queries
//!
//! Each structural grammar ships a highlights query. Its capture names
//! (`keyword`, `function.method`, `punctuation.bracket`, ...) are mapped onto
//! token categories once, when the query is compiled.

use tree_sitter::Query;

use super::category::Category;
use super::languages::LanguageId;

const PYTHON_HIGHLIGHTS: &str = include_str!("../../queries/python/highlights.scm");
const YAML_HIGHLIGHTS: &str = include_str!("../../queries/yaml/highlights.scm");
const MARKDOWN_HIGHLIGHTS: &str = include_str!("../../queries/markdown/highlights.scm");
const HTML_HIGHLIGHTS: &str = include_str!("../../queries/html/highlights.scm");
const CSS_HIGHLIGHTS: &str = include_str!("../../queries/css/highlights.scm");
const JAVASCRIPT_HIGHLIGHTS: &str = include_str!("../../queries/javascript/highlights.scm");
const TYPESCRIPT_HIGHLIGHTS: &str = include_str!("../../queries/typescript/highlights.scm");
const JSON_HIGHLIGHTS: &str = include_str!("../../queries/json/highlights.scm");
const TOML_HIGHLIGHTS: &str = include_str!("../../queries/toml/highlights.scm");

// Bundled with the grammar crates
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const PHP_HIGHLIGHTS: &str = tree_sitter_php::HIGHLIGHTS_QUERY;
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;
const SCHEME_HIGHLIGHTS: &str = tree_sitter_racket::HIGHLIGHTS_QUERY;
const INI_HIGHLIGHTS: &str = tree_sitter_ini::HIGHLIGHTS_QUERY;
const XML_HIGHLIGHTS: &str = tree_sitter_xml::XML_HIGHLIGHT_QUERY;

/// Query source for a language; the Python query leaves plain identifiers
/// to scope analysis
pub fn highlights_source(language: LanguageId) -> Option<&'static str> {
    let source = match language {
        LanguageId::PlainText => return None,
        LanguageId::Python => PYTHON_HIGHLIGHTS,
        LanguageId::Rust => RUST_HIGHLIGHTS,
        LanguageId::JavaScript => JAVASCRIPT_HIGHLIGHTS,
        LanguageId::TypeScript | LanguageId::Tsx => TYPESCRIPT_HIGHLIGHTS,
        LanguageId::Json => JSON_HIGHLIGHTS,
        LanguageId::Toml => TOML_HIGHLIGHTS,
        LanguageId::Yaml => YAML_HIGHLIGHTS,
        LanguageId::Markdown => MARKDOWN_HIGHLIGHTS,
        LanguageId::Html => HTML_HIGHLIGHTS,
        LanguageId::Css => CSS_HIGHLIGHTS,
        LanguageId::Go => GO_HIGHLIGHTS,
        LanguageId::Php => PHP_HIGHLIGHTS,
        LanguageId::C => C_HIGHLIGHTS,
        LanguageId::Cpp => CPP_HIGHLIGHTS,
        LanguageId::Java => JAVA_HIGHLIGHTS,
        LanguageId::Bash => BASH_HIGHLIGHTS,
        LanguageId::Scheme => SCHEME_HIGHLIGHTS,
        LanguageId::Ini => INI_HIGHLIGHTS,
        LanguageId::Xml => XML_HIGHLIGHTS,
    };
    Some(source)
}

/// Capture name → category. Names missing here resolve through their
/// parent (`keyword.control.import` → `keyword`).
const CAPTURE_CATEGORIES: &[(&str, Category)] = &[
    ("attribute", Category::NAME_DECORATOR),
    ("boolean", Category::KEYWORD_CONSTANT),
    ("comment", Category::COMMENT),
    ("constant", Category::NAME_CONSTANT),
    ("constant.builtin", Category::KEYWORD_CONSTANT),
    ("constructor", Category::NAME_CLASS),
    ("escape", Category::STRING_ESCAPE),
    ("function", Category::NAME_FUNCTION),
    ("function.builtin", Category::NAME_BUILTIN),
    ("function.macro", Category::NAME_FUNCTION_MAGIC),
    ("keyword", Category::KEYWORD),
    ("keyword.operator", Category::OPERATOR_WORD),
    ("label", Category::NAME_LABEL),
    ("module", Category::NAME_NAMESPACE),
    ("namespace", Category::NAME_NAMESPACE),
    ("number", Category::NUMBER),
    ("operator", Category::OPERATOR),
    ("property", Category::NAME_PROPERTY),
    // Brackets stay plain punctuation so depth coloring sees them
    ("punctuation", Category::PUNCTUATION),
    ("string", Category::STRING),
    ("string.escape", Category::STRING_ESCAPE),
    ("string.special", Category::STRING_OTHER),
    ("tag", Category::NAME_TAG),
    ("tag.attribute", Category::NAME_ATTRIBUTE),
    ("text", Category::TEXT),
    ("text.emphasis", Category::GENERIC_EMPH),
    ("text.strong", Category::GENERIC_STRONG),
    ("text.title", Category::GENERIC_HEADING),
    ("type", Category::NAME_CLASS),
    ("type.builtin", Category::KEYWORD_TYPE),
    ("variable", Category::NAME),
    ("variable.builtin", Category::NAME_BUILTIN_PSEUDO),
    ("variable.parameter", Category::NAME_VARIABLE),
];

/// Category for a capture name, trying progressively shorter parents
pub fn category_for_capture(name: &str) -> Option<Category> {
    let mut current = name;
    loop {
        if let Some((_, category)) = CAPTURE_CATEGORIES.iter().find(|(n, _)| *n == current) {
            return Some(category.clone());
        }
        let dot = current.rfind('.')?;
        current = &current[..dot];
    }
}

/// A compiled highlights query with its captures already mapped
pub struct HighlightQuery {
    pub query: Query,
    /// Indexed by capture index; `None` for captures that carry no category
    pub categories: Vec<Option<Category>>,
}

impl HighlightQuery {
    /// Compile the query for `language`, or `None` if it has none or it
    /// fails to compile
    pub fn compile(language: LanguageId, ts_language: &tree_sitter::Language) -> Option<Self> {
        let source = highlights_source(language)?;
        let query = match Query::new(ts_language, source) {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", language, e);
                return None;
            }
        };

        let categories = query
            .capture_names()
            .iter()
            .map(|name| category_for_capture(name))
            .collect();
        Some(Self { query, categories })
    }

    pub fn category(&self, capture_index: u32) -> Option<&Category> {
        self.categories.get(capture_index as usize)?.as_ref()
    }
}
