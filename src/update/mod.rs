//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod document;
mod syntax;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::EngineModel;

#[cfg(debug_assertions)]
use crate::messages::{DocumentMsg, SyntaxMsg};
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use document::update_document;
pub use syntax::{launch_tokenize, update_syntax};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Document(m) => document::update_document(model, m),
        Msg::Syntax(m) => syntax::update_syntax(model, m),
    }
}

#[cfg(debug_assertions)]
fn update_traced(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = model.highlight.phase();
    let result = update_inner(model, msg);
    let after = model.highlight.phase();

    if before != after {
        debug!(target: "scheduler", ?before, ?after, "phase changed");
    }

    result
}

#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Document(DocumentMsg::Replace { .. }) => "Document::Replace".to_string(),
        Msg::Document(DocumentMsg::SetText(_)) => "Document::SetText".to_string(),
        Msg::Syntax(m) => match m {
            SyntaxMsg::TextChanged { .. } => "Syntax::TextChanged".to_string(),
            SyntaxMsg::ParseReady { revision } => format!("Syntax::ParseReady(rev {})", revision),
            SyntaxMsg::ParseCompleted { generation, .. } => {
                format!("Syntax::ParseCompleted(gen {})", generation)
            }
            SyntaxMsg::GrammarChanged { grammar } => {
                format!("Syntax::GrammarChanged({:?})", grammar.language())
            }
            SyntaxMsg::StyleChanged { .. } => "Syntax::StyleChanged".to_string(),
            SyntaxMsg::ForceRecompute => "Syntax::ForceRecompute".to_string(),
        },
    }
}
