//! Bracket depth tracking
//!
//! Assigns a cyclic nesting depth (0, 1, 2, 0, ...) to bracket punctuation so
//! nested brackets can be styled differently. Depth is a whole-document
//! property: only a pass over the complete token stream is authoritative.

use super::category::Category;

/// Number of distinct bracket depths before cycling
pub const BRACKET_DEPTHS: u8 = 3;

/// Whether `value` is one of `( ) { } [ ]`
pub fn is_bracket(value: &str) -> bool {
    matches!(value, "(" | ")" | "{" | "}" | "[" | "]")
}

fn is_opener(value: &str) -> bool {
    matches!(value, "(" | "{" | "[")
}

/// Stateful depth counter for one pass over a token stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketDepth {
    depth: u8,
}

impl BracketDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current depth, always in `0..BRACKET_DEPTHS`
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Assign a depth to the bracket `value` and advance the counter.
    ///
    /// A closer decrements before taking its depth, an opener takes its depth
    /// and then increments, so a matching pair shares one depth. Returns
    /// `None` for anything that is not a bracket.
    pub fn assign(&mut self, value: &str) -> Option<u8> {
        if !is_bracket(value) {
            return None;
        }

        if is_opener(value) {
            let assigned = self.depth;
            self.depth = (self.depth + 1) % BRACKET_DEPTHS;
            Some(assigned)
        } else {
            self.depth = (self.depth + BRACKET_DEPTHS - 1) % BRACKET_DEPTHS;
            Some(self.depth)
        }
    }
}

/// The category for a bracket at `depth`
pub fn depth_category(depth: u8) -> Category {
    match depth % BRACKET_DEPTHS {
        0 => Category::BRACKET_DEPTH_0,
        1 => Category::BRACKET_DEPTH_1,
        _ => Category::BRACKET_DEPTH_2,
    }
}
