//! Synchronous fallback highlighting
//!
//! Used for lines that changed since the last background run. Only the
//! line itself is lexed: no bracket depths, value overrides or semantic
//! refinement, so the result is available immediately on the caller's
//! thread.

use super::brackets::is_bracket;
use super::category::Category;
use super::highlights::{LineSplitter, TokenSpan};
use super::lexer::{Grammar, Lexer};

/// Lex one line of text in isolation.
///
/// Brackets get the uniform `Punctuation.Bracket` category. A trailing
/// newline is ignored.
pub fn highlight_line(lexer: &mut Lexer, line_text: &str) -> Vec<TokenSpan> {
    let text = line_text.strip_suffix('\n').unwrap_or(line_text);
    let mut splitter = LineSplitter::new();

    for token in lexer.tokenize(text) {
        let category = if token.category == Category::PUNCTUATION && is_bracket(token.value) {
            Category::BRACKET
        } else {
            token.category
        };
        splitter.push(&category, token.value);
    }

    splitter.finish().into_iter().next().unwrap_or_default()
}

/// Fallback spans for each line in `lines`, sharing one lexer
pub fn highlight_lines<'a>(
    grammar: &Grammar,
    lines: impl IntoIterator<Item = &'a str>,
) -> Vec<Vec<TokenSpan>> {
    let mut lexer = grammar.lexer();
    lines
        .into_iter()
        .map(|line| highlight_line(&mut lexer, line))
        .collect()
}
