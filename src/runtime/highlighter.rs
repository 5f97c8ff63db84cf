use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::messages::{DocumentMsg, Msg, SyntaxMsg};
use crate::model::{Document, EngineModel, RenderMode, SchedulerPhase};
use crate::semantic::ModuleResolver;
use crate::syntax::{Grammar, LineCache, TextFormat, TokenSpan};
use crate::theme::Theme;
use crate::update::update;

/// Fired after a background result is swapped in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEvent {
    pub generation: u64,
    /// Document revision the cache was built from
    pub revision: u64,
    pub mode: RenderMode,
}

type CacheListener = Box<dyn FnMut(&CacheEvent) + Send>;

/// Incremental highlighter for one document.
///
/// All entry points return immediately. Debounce timers and tokenizer runs
/// happen on spawned threads and report back through a channel that the
/// host drains with [`Highlighter::process_async_messages`].
pub struct Highlighter {
    model: EngineModel,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    listeners: Vec<CacheListener>,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("model", &self.model)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Highlighter {
    /// Plain text highlighter over `text`; no import resolution
    pub fn new(text: &str, theme: Theme) -> Self {
        Self::with_model(EngineModel::new(
            Document::with_text(text),
            theme,
            DEFAULT_DEBOUNCE_MS,
        ))
    }

    pub fn with_model(model: EngineModel) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            msg_tx,
            msg_rx,
            listeners: Vec::new(),
        }
    }

    /// Open a file, selecting the grammar from its name
    pub fn open(path: &Path, theme: Theme) -> Result<Self, String> {
        let document = Document::from_file(path.to_path_buf())
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Ok(Self::with_model(EngineModel::new(
            document,
            theme,
            DEFAULT_DEBOUNCE_MS,
        )))
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.model.resolver = resolver;
        self
    }

    pub fn with_debounce(mut self, delay_ms: u64) -> Self {
        self.model.highlight.debounce_ms = delay_ms;
        self
    }

    pub fn model(&self) -> &EngineModel {
        &self.model
    }

    pub fn document(&self) -> &Document {
        &self.model.document
    }

    pub fn render_mode(&self) -> RenderMode {
        self.model.highlight.mode
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.model.highlight.phase()
    }

    /// The current cache, shared
    pub fn cache(&self) -> Option<Arc<LineCache>> {
        self.model.highlight.cache.clone()
    }

    /// Register a callback for cache swaps
    pub fn on_cache_ready(&mut self, listener: impl FnMut(&CacheEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Select the grammar from a file name, extension or language name.
    ///
    /// Unknown hints give plain text. Triggers a recompute.
    pub fn set_grammar(&mut self, hint: &str) {
        let grammar = Grammar::resolve(hint);
        self.dispatch(Msg::Syntax(SyntaxMsg::GrammarChanged { grammar }));
    }

    /// Install a new theme (and with it the style table); triggers a recompute
    pub fn set_style_table(&mut self, theme: Theme) {
        self.dispatch(Msg::Syntax(SyntaxMsg::StyleChanged {
            theme: Box::new(theme),
        }));
    }

    /// Tokenize now, skipping the debounce interval
    pub fn force_recompute(&mut self) {
        self.dispatch(Msg::Syntax(SyntaxMsg::ForceRecompute));
    }

    /// Replace `chars_removed` characters at `position` with `text`
    pub fn edit(&mut self, position: usize, chars_removed: usize, text: &str) {
        self.dispatch(Msg::replace(position, chars_removed, text));
    }

    /// Replace the whole text
    pub fn set_text(&mut self, text: &str) {
        self.dispatch(Msg::Document(DocumentMsg::SetText(text.to_string())));
    }

    /// Report an edit already applied through [`Highlighter::buffer_mut`]
    pub fn notify_text_changed(
        &mut self,
        position: usize,
        chars_removed: usize,
        chars_added: usize,
    ) {
        self.dispatch(Msg::text_changed(position, chars_removed, chars_added));
    }

    /// Direct access to the text; follow edits with `notify_text_changed`
    pub fn buffer_mut(&mut self) -> &mut ropey::Rope {
        &mut self.model.document.buffer
    }

    /// Spans to render for a line
    pub fn spans_for_line(&self, line: usize) -> Vec<TokenSpan> {
        self.model.spans_for_line(line)
    }

    /// Display format for a span under the current style table
    pub fn format_for(&self, span: &TokenSpan) -> Option<TextFormat> {
        self.model.format_for(span)
    }

    /// Run one message through update and execute the resulting command.
    ///
    /// Returns whether a redraw is needed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    /// Drain timer and worker messages; returns whether a redraw is needed
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            needs_redraw |= self.dispatch(msg);
        }
        needs_redraw
    }

    /// Block until no timer or run is outstanding, or `timeout` passes.
    ///
    /// Returns whether the scheduler went idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.process_async_messages();
            if self.phase() == SchedulerPhase::Idle {
                return true;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                Err(RecvTimeoutError::Timeout) => return self.phase() == SchedulerPhase::Idle,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::DebouncedTokenize { revision, delay_ms } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Syntax(SyntaxMsg::ParseReady { revision }));
                });
            }
            Cmd::RunTokenize(job) => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let generation = job.generation;
                    let cache = job.run();
                    let _ = tx.send(Msg::Syntax(SyntaxMsg::ParseCompleted { generation, cache }));
                });
            }
            Cmd::CacheSwapped {
                generation,
                revision,
            } => {
                let event = CacheEvent {
                    generation,
                    revision,
                    mode: self.model.highlight.mode,
                };
                for listener in &mut self.listeners {
                    listener(&event);
                }
            }
        }
    }
}
