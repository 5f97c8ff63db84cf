//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::syntax::TokenizeJob;

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Start debounce timer for tokenization
    /// After delay_ms, sends Msg::Syntax(ParseReady)
    DebouncedTokenize { revision: u64, delay_ms: u64 },
    /// Run the background tokenizer in a worker
    /// Sends Msg::Syntax(ParseCompleted) when done
    RunTokenize(Box<TokenizeJob>),
    /// A new cache was swapped in; visible lines must be re-rendered
    CacheSwapped { generation: u64, revision: u64 },
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Scheduling commands don't need immediate redraw - the swap does
            Cmd::DebouncedTokenize { .. } => false,
            Cmd::RunTokenize(_) => false,
            Cmd::CacheSwapped { .. } => true,
        }
    }
}
