//! Document update functions
//!
//! Applies edits to the engine's copy of the text, then hands the change to
//! the syntax handler.

use crate::commands::Cmd;
use crate::messages::{DocumentMsg, SyntaxMsg};
use crate::model::EngineModel;

use super::syntax::update_syntax;

/// Handle document messages
pub fn update_document(model: &mut EngineModel, msg: DocumentMsg) -> Option<Cmd> {
    let (position, chars_removed, text) = match msg {
        DocumentMsg::Replace {
            position,
            chars_removed,
            text,
        } => (position, chars_removed, text),
        DocumentMsg::SetText(text) => (0, model.document.buffer.len_chars(), text),
    };

    let position = position.min(model.document.buffer.len_chars());
    let removed = model.document.replace(position, chars_removed, &text);
    let added = text.chars().count();

    if removed == 0 && added == 0 {
        return None;
    }

    update_syntax(
        model,
        SyntaxMsg::TextChanged {
            position,
            chars_removed: removed,
            chars_added: added,
        },
    )
}
