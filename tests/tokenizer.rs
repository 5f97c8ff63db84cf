//! Background tokenizer tests
//!
//! Coverage, ordering, idempotence, bracket depths and semantic
//! classification over whole documents.

mod common;

use common::{assert_covers, python_cache, PYTHON_SAMPLE};
use lumen::syntax::{
    is_bracket, tokenize_document, Category, Grammar, LanguageId, StyleTable, ALL_LANGUAGES,
};

fn category_on(cache: &lumen::LineCache, line: usize, text: &str) -> Option<Category> {
    cache
        .line(line)
        .iter()
        .find(|s| s.text == text)
        .map(|s| s.category.clone())
}

#[test]
fn test_coverage_python_sample() {
    let cache = python_cache(PYTHON_SAMPLE);
    assert_covers(&cache, PYTHON_SAMPLE);
}

#[test]
fn test_coverage_awkward_inputs() {
    let inputs = [
        "",
        "\n",
        "\n\n\n",
        "   \n\t\n",
        "x = 'unterminated\n",
        "def f(:\n    ]]\n",
        "s = \"\"\"multi\nline\n\"\"\"\n",
        "# só ünïcode 🎉\nπ = 3.14\n",
        "no trailing newline",
    ];
    for input in inputs {
        let cache = python_cache(input);
        assert_covers(&cache, input);
    }
}

#[test]
fn test_coverage_every_grammar() {
    let text = "a = (1, [2, {3}])\n// c\n# c\n<b x=\"y\">t</b>\n";
    for &language in ALL_LANGUAGES {
        let grammar = Grammar::for_language(language);
        let cache = tokenize_document(text, &grammar, &StyleTable::new(), None, 1, 0);
        assert_covers(&cache, text);
        assert_eq!(cache.language(), language);
    }
}

#[test]
fn test_idempotent() {
    let first = python_cache(PYTHON_SAMPLE);
    let second = python_cache(PYTHON_SAMPLE);
    assert!(first.same_spans(&second));
    assert_eq!(first, second);
}

#[test]
fn test_bracket_cycling() {
    let grammar = Grammar::for_language(LanguageId::Python);
    let cache = tokenize_document("x = (((())))\n", &grammar, &StyleTable::new(), None, 1, 0);
    let depths: Vec<&str> = cache
        .line(0)
        .iter()
        .filter(|s| is_bracket(&s.text))
        .map(|s| s.category.as_str())
        .collect();

    let d = |n: u8| match n {
        0 => "Punctuation.Bracket.Depth0",
        1 => "Punctuation.Bracket.Depth1",
        _ => "Punctuation.Bracket.Depth2",
    };
    assert_eq!(
        depths,
        vec![d(0), d(1), d(2), d(0), d(0), d(2), d(1), d(0)]
    );
}

#[test]
fn test_brackets_in_strings_are_not_counted() {
    let grammar = Grammar::for_language(LanguageId::Python);
    let cache = tokenize_document("f('(', [x])\n", &grammar, &StyleTable::new(), None, 1, 0);
    assert_eq!(category_on(&cache, 0, "'('"), Some(Category::STRING));
    assert_eq!(category_on(&cache, 0, "["), Some(Category::BRACKET_DEPTH_1));
}

#[test]
fn test_semantic_classification_example() {
    let cache = python_cache("class Foo:\n\tdef bar(self):\n\t\tx = 1\n");
    assert_eq!(category_on(&cache, 0, "Foo"), Some(Category::NAME_CLASS));
    assert_eq!(category_on(&cache, 1, "bar"), Some(Category::NAME_FUNCTION));
    assert_eq!(category_on(&cache, 2, "x"), Some(Category::NAME_VARIABLE));
}

#[test]
fn test_sample_classification() {
    let cache = python_cache(PYTHON_SAMPLE);

    assert_eq!(category_on(&cache, 0, "os"), Some(Category::NAME_NAMESPACE));
    assert_eq!(category_on(&cache, 1, "OD"), Some(Category::NAME_NAMESPACE));
    assert_eq!(category_on(&cache, 3, "MAX_ITEMS"), Some(Category::NAME_CONSTANT));
    assert_eq!(category_on(&cache, 6, "Store"), Some(Category::NAME_CLASS));
    assert_eq!(category_on(&cache, 7, "__init__"), Some(Category::NAME_FUNCTION));
    assert_eq!(category_on(&cache, 8, "self"), Some(Category::NAME_BUILTIN_PSEUDO));
    assert_eq!(category_on(&cache, 12, "MAX_ITEMS"), Some(Category::NAME_CONSTANT));
    // `len` is a builtin to the lexer, remapped by the theme's value override
    assert_eq!(category_on(&cache, 12, "len"), Some(Category::NAME_FUNCTION));
    // Attribute call shape
    assert_eq!(category_on(&cache, 14, "getpid"), Some(Category::NAME_FUNCTION));
    assert_eq!(category_on(&cache, 18, "store"), Some(Category::NAME_VARIABLE));
    assert_eq!(category_on(&cache, 18, "Store"), Some(Category::NAME_CLASS));
    assert_eq!(category_on(&cache, 19, "add"), Some(Category::NAME_FUNCTION));
}

#[test]
fn test_unknown_grammar_hint_is_plain_text() {
    let grammar = Grammar::resolve("notes.unknown-extension");
    assert_eq!(grammar.language(), LanguageId::PlainText);

    let cache = tokenize_document("a (b)\nc\n", &grammar, &StyleTable::new(), None, 1, 0);
    assert_eq!(cache.line(0).len(), 1);
    assert_eq!(cache.line(0)[0].category, Category::TEXT);
}
