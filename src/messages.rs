//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::syntax::{Grammar, LineCache};
use crate::theme::Theme;

/// Edits applied to the engine's own copy of the text
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Replace `chars_removed` characters at `position` with `text`
    Replace {
        position: usize,
        chars_removed: usize,
        text: String,
    },
    /// Replace the whole text
    SetText(String),
}

/// Syntax tokenization messages
#[derive(Debug, Clone)]
pub enum SyntaxMsg {
    /// The text changed (positions in characters, after the edit)
    TextChanged {
        position: usize,
        chars_removed: usize,
        chars_added: usize,
    },
    /// Debounce interval elapsed for a revision
    ParseReady { revision: u64 },
    /// A background run finished
    ParseCompleted { generation: u64, cache: LineCache },
    /// A different grammar was selected
    GrammarChanged { grammar: Grammar },
    /// A new theme (and so a new style table) was installed
    StyleChanged { theme: Box<Theme> },
    /// Tokenize now, skipping the debounce interval
    ForceRecompute,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Document(DocumentMsg),
    Syntax(SyntaxMsg),
}

impl Msg {
    /// Create a text replacement message
    pub fn replace(position: usize, chars_removed: usize, text: impl Into<String>) -> Self {
        Msg::Document(DocumentMsg::Replace {
            position,
            chars_removed,
            text: text.into(),
        })
    }

    /// Create a change notification for text edited elsewhere
    pub fn text_changed(position: usize, chars_removed: usize, chars_added: usize) -> Self {
        Msg::Syntax(SyntaxMsg::TextChanged {
            position,
            chars_removed,
            chars_added,
        })
    }
}
