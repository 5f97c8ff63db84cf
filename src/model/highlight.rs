//! Highlight state - the cache slot, fallback spans and scheduler bookkeeping

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::syntax::{LineCache, StyleTable, TokenSpan};

/// How lines are currently being served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// No cache matches the current text; edited lines are lexed on the spot
    #[default]
    Fallback,
    /// The cache was built from the current revision
    Cached,
}

/// Debounce scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerPhase {
    #[default]
    Idle,
    /// A quiet-interval timer is armed
    Pending,
    /// A background run is in flight and nothing newer is waiting
    Running,
}

/// Everything the engine knows about the current highlighting
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    /// Style table for the current grammar, shared with background runs
    pub styles: Arc<StyleTable>,
    /// Latest accepted background result; replaced as a whole
    pub cache: Option<Arc<LineCache>>,
    pub mode: RenderMode,
    /// Fallback spans for lines edited since the cache was built
    pub fallback: BTreeMap<usize, Vec<TokenSpan>>,
    /// Line count seen at the last change notification
    pub known_lines: usize,
    /// Generation of the most recent background launch
    pub latest_generation: u64,
    /// Launched generations that have not reported back
    pub in_flight: BTreeSet<u64>,
    /// Revision the armed debounce timer will tokenize, if any
    pub pending_revision: Option<u64>,
    /// Quiet interval before a background run
    pub debounce_ms: u64,
}

impl HighlightState {
    pub fn new(styles: StyleTable, debounce_ms: u64) -> Self {
        Self {
            styles: Arc::new(styles),
            debounce_ms,
            ..Self::default()
        }
    }

    /// Derived from pending/in-flight bookkeeping; a pending timer wins over
    /// a running job since another run will follow it
    pub fn phase(&self) -> SchedulerPhase {
        if self.pending_revision.is_some() {
            SchedulerPhase::Pending
        } else if !self.in_flight.is_empty() {
            SchedulerPhase::Running
        } else {
            SchedulerPhase::Idle
        }
    }

    /// Claim the next generation number for a launch
    pub fn next_generation(&mut self) -> u64 {
        self.latest_generation += 1;
        self.in_flight.insert(self.latest_generation);
        self.latest_generation
    }

    /// Cached spans for a line, if a cache exists
    pub fn cached_line(&self, line: usize) -> Option<&[TokenSpan]> {
        self.cache.as_deref().map(|cache| cache.line(line))
    }

    /// Forget fallback spans for `start..=end`, or for every line from
    /// `start` on when lines shifted
    pub fn invalidate_fallback(&mut self, start: usize, end: usize, lines_shifted: bool) {
        if lines_shifted {
            self.fallback.retain(|line, _| *line < start);
        } else {
            self.fallback.retain(|line, _| *line < start || *line > end);
        }
    }
}
