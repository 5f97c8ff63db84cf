//! Background tokenizer
//!
//! Produces the authoritative line cache for a whole document snapshot:
//! lexing, bracket depth assignment, value overrides and semantic name
//! classification. Pure with respect to its inputs, so it can run on any
//! thread while the document keeps changing.

use std::sync::Arc;

use super::brackets::{depth_category, is_bracket, BracketDepth};
use super::category::Category;
use super::highlights::{LineCache, LineSplitter, TokenSpan};
use super::lexer::{Grammar, RawToken};
use super::style::StyleTable;
use crate::semantic::{ExternalScopes, ModuleResolver, ScopeAnalyzer, SourceAnalysis, SymbolKind};

/// Symbol information for one tokenizer run
#[derive(Debug, Clone, Default)]
pub struct SemanticContext {
    pub local: SourceAnalysis,
    pub external: ExternalScopes,
}

impl SemanticContext {
    /// Analyze `text` and every module it imports that `resolver` can find
    pub fn build(text: &str, resolver: &dyn ModuleResolver) -> Self {
        let mut analyzer = ScopeAnalyzer::new();
        let local = analyzer.analyze(text);
        let external = ExternalScopes::load(&local.modules, resolver, &mut analyzer);
        tracing::debug!(
            "Semantic context: {} local scopes, {}/{} imports loaded",
            local.scopes.len(),
            external.len(),
            local.modules.len()
        );
        Self { local, external }
    }

    /// Kind for `name` at `line`: unanimous external answer, else local
    pub fn kind_of(&self, name: &str, line: usize) -> Option<SymbolKind> {
        self.external
            .unanimous(name, line)
            .or_else(|| self.local.lookup(name, line))
    }

    /// Refine a `Name` token.
    ///
    /// `prev`/`next` are the values of the adjacent tokens in the stream; a
    /// name reached through `.` and immediately called is a function.
    pub fn classify_name(
        &self,
        name: &str,
        line: usize,
        prev: Option<&str>,
        next: Option<&str>,
    ) -> Category {
        let called = prev == Some(".") && next.is_some_and(|n| n.starts_with('('));
        if called {
            return Category::NAME_FUNCTION;
        }

        match self.kind_of(name, line) {
            Some(SymbolKind::Class) => Category::NAME_CLASS,
            Some(SymbolKind::Function) => Category::NAME_FUNCTION,
            Some(SymbolKind::Variable) if is_constant_case(name) => Category::NAME_CONSTANT,
            Some(SymbolKind::Variable) => Category::NAME_VARIABLE,
            None if self.local.is_imported(name) => Category::NAME_NAMESPACE,
            None if is_constant_case(name) => Category::NAME_CONSTANT,
            None => Category::NAME,
        }
    }
}

/// At least one uppercase letter and no lowercase ones (`MAX_SIZE`, `X1`)
pub fn is_constant_case(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Classify a lexed token stream into per-line spans
pub fn classify_tokens(
    tokens: &[RawToken<'_>],
    styles: &StyleTable,
    semantics: Option<&SemanticContext>,
) -> Vec<Vec<TokenSpan>> {
    let mut depth = BracketDepth::new();
    let mut splitter = LineSplitter::new();

    for (i, token) in tokens.iter().enumerate() {
        let raw = &token.category;

        let category = if *raw == Category::PUNCTUATION && is_bracket(token.value) {
            depth
                .assign(token.value)
                .map(depth_category)
                .unwrap_or_else(|| raw.clone())
        } else if styles.has_overrides(raw) {
            // Categories with value overrides never reach semantic refinement
            styles.override_for(raw, token.value).unwrap_or(raw).clone()
        } else if let (true, Some(ctx)) = (*raw == Category::NAME, semantics) {
            let prev = i.checked_sub(1).map(|p| tokens[p].value);
            let next = tokens.get(i + 1).map(|t| t.value);
            let refined = ctx.classify_name(token.value, splitter.line(), prev, next);
            tracing::trace!("{:?} at line {} -> {}", token.value, splitter.line(), refined);
            refined
        } else {
            raw.clone()
        };

        splitter.push(&category, token.value);
    }

    splitter.finish()
}

/// Tokenize a full document into a line cache
pub fn tokenize_document(
    text: &str,
    grammar: &Grammar,
    styles: &StyleTable,
    semantics: Option<&SemanticContext>,
    generation: u64,
    revision: u64,
) -> LineCache {
    let tokens = grammar.tokenize(text);
    let lines = classify_tokens(&tokens, styles, semantics);
    LineCache::new(lines, grammar.language(), generation, revision)
}

/// Everything one background run needs, detached from the live document
#[derive(Clone)]
pub struct TokenizeJob {
    pub generation: u64,
    pub revision: u64,
    pub text: Arc<str>,
    pub grammar: Grammar,
    pub styles: Arc<StyleTable>,
    pub resolver: Arc<dyn ModuleResolver>,
}

impl std::fmt::Debug for TokenizeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizeJob")
            .field("generation", &self.generation)
            .field("revision", &self.revision)
            .field("bytes", &self.text.len())
            .field("grammar", &self.grammar)
            .finish()
    }
}

impl TokenizeJob {
    /// Run the full pipeline; semantic context is built only for languages
    /// with scope analysis
    pub fn run(&self) -> LineCache {
        #[cfg(feature = "profile-tracing")]
        let _span = tracing::info_span!("tokenize", generation = self.generation).entered();

        let semantics = self
            .grammar
            .language()
            .has_semantics()
            .then(|| SemanticContext::build(&self.text, self.resolver.as_ref()));

        let cache = tokenize_document(
            &self.text,
            &self.grammar,
            &self.styles,
            semantics.as_ref(),
            self.generation,
            self.revision,
        );

        tracing::debug!(
            "Tokenized generation {} (rev {}): {} lines",
            self.generation,
            self.revision,
            cache.line_count()
        );
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::NoModules;
    use crate::syntax::languages::LanguageId;
    use crate::syntax::style::{StyleEntry, ValueOverride};

    fn python(text: &str, styles: &StyleTable) -> LineCache {
        let grammar = Grammar::for_language(LanguageId::Python);
        let semantics = SemanticContext::build(text, &NoModules);
        tokenize_document(text, &grammar, styles, Some(&semantics), 1, 0)
    }

    fn category_of(cache: &LineCache, line: usize, text: &str) -> Option<Category> {
        cache
            .line(line)
            .iter()
            .find(|s| s.text == text)
            .map(|s| s.category.clone())
    }

    #[test]
    fn test_semantic_classes_functions_variables() {
        let cache = python("class Foo:\n\tdef bar(self):\n\t\tx = 1\n", &StyleTable::new());
        assert_eq!(category_of(&cache, 0, "Foo"), Some(Category::NAME_CLASS));
        assert_eq!(category_of(&cache, 1, "bar"), Some(Category::NAME_FUNCTION));
        assert_eq!(category_of(&cache, 2, "x"), Some(Category::NAME_VARIABLE));
        // Parameters are not bound by scope analysis
        assert_eq!(category_of(&cache, 1, "self"), Some(Category::NAME_BUILTIN_PSEUDO));
    }

    #[test]
    fn test_unbound_parameter_stays_raw() {
        let cache = python("def f(arg):
    return arg
", &StyleTable::new());
        assert_eq!(category_of(&cache, 1, "arg"), Some(Category::NAME));
    }

    #[test]
    fn test_constants_and_namespaces() {
        let cache = python(
            "import os\nMAX = 3\nprint(os, MAX, UNKNOWN, other)\n",
            &StyleTable::new(),
        );
        assert_eq!(category_of(&cache, 1, "MAX"), Some(Category::NAME_CONSTANT));
        assert_eq!(category_of(&cache, 2, "os"), Some(Category::NAME_NAMESPACE));
        assert_eq!(category_of(&cache, 2, "UNKNOWN"), Some(Category::NAME_CONSTANT));
        assert_eq!(category_of(&cache, 2, "other"), Some(Category::NAME));
    }

    #[test]
    fn test_attribute_call_is_function_even_for_classes() {
        let source = "class Foo:\n    pass\nobj.Foo()\nobj.Foo\n";
        let cache = python(source, &StyleTable::new());
        assert_eq!(category_of(&cache, 2, "Foo"), Some(Category::NAME_FUNCTION));
        assert_eq!(category_of(&cache, 3, "Foo"), Some(Category::NAME_CLASS));
    }

    #[test]
    fn test_bare_call_keeps_resolved_kind() {
        let source = "class Foo:\n    pass\nFoo()\n";
        let cache = python(source, &StyleTable::new());
        assert_eq!(category_of(&cache, 2, "Foo"), Some(Category::NAME_CLASS));
    }

    #[test]
    fn test_bracket_depths_across_lines() {
        let cache = python("f(\n  [1,\n   (2)],\n)\n", &StyleTable::new());
        let brackets: Vec<(usize, String, Category)> = cache
            .lines()
            .iter()
            .enumerate()
            .flat_map(|(n, spans)| {
                spans
                    .iter()
                    .filter(|s| is_bracket(&s.text))
                    .map(move |s| (n, s.text.clone(), s.category.clone()))
            })
            .collect();

        assert_eq!(
            brackets,
            vec![
                (0, "(".to_string(), Category::BRACKET_DEPTH_0),
                (1, "[".to_string(), Category::BRACKET_DEPTH_1),
                (2, "(".to_string(), Category::BRACKET_DEPTH_2),
                (2, ")".to_string(), Category::BRACKET_DEPTH_2),
                (2, "]".to_string(), Category::BRACKET_DEPTH_1),
                (3, ")".to_string(), Category::BRACKET_DEPTH_0),
            ]
        );
    }

    fn name_rule(values: &[&str], category: Category) -> StyleTable {
        let mut styles = StyleTable::new();
        styles.insert(
            &Category::NAME,
            StyleEntry {
                format: None,
                overrides: vec![ValueOverride {
                    values: values.iter().map(|v| v.to_string()).collect(),
                    category,
                }],
            },
        );
        styles
    }

    #[test]
    fn test_value_override_beats_semantics() {
        let styles = name_rule(&["total"], Category::NAME_CONSTANT);
        let cache = python("total = 1\n", &styles);
        assert_eq!(category_of(&cache, 0, "total"), Some(Category::NAME_CONSTANT));
    }

    #[test]
    fn test_overridden_category_skips_semantics_for_unlisted_values() {
        let styles = name_rule(&["self"], Category::NAME_BUILTIN_PSEUDO);
        let cache = python("other = 2\nother\n", &styles);
        assert_eq!(category_of(&cache, 0, "other"), Some(Category::NAME));
        assert_eq!(category_of(&cache, 1, "other"), Some(Category::NAME));

        // Without the rule the same text is refined
        let cache = python("other = 2\nother\n", &StyleTable::new());
        assert_eq!(category_of(&cache, 1, "other"), Some(Category::NAME_VARIABLE));
    }

    #[test]
    fn test_without_semantics_names_stay_raw() {
        let grammar = Grammar::for_language(LanguageId::Python);
        let cache = tokenize_document("x = 1\n", &grammar, &StyleTable::new(), None, 7, 3);
        assert_eq!(category_of(&cache, 0, "x"), Some(Category::NAME));
        assert_eq!(cache.generation(), 7);
        assert_eq!(cache.revision(), 3);
    }

    #[test]
    fn test_constant_case() {
        assert!(is_constant_case("MAX_SIZE"));
        assert!(is_constant_case("X1"));
        assert!(!is_constant_case("Max"));
        assert!(!is_constant_case("_"));
        assert!(!is_constant_case("__"));
    }
}
