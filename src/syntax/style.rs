//! Style table and format resolution
//!
//! The style table is a registry built once from a theme: every styled
//! category path and each of its ancestors gets a node carrying the parent
//! path, an optional display format, and optional value overrides. Format
//! lookups and overrides only ever consult this registry.

use std::collections::HashMap;

use super::category::{parent_path, Category};
use crate::theme::Color;

/// Display attributes for a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextFormat {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

impl TextFormat {
    /// Parse a font style string such as `"bold italic"`
    pub fn with_font_style(mut self, font_style: &str) -> Self {
        for word in font_style.split_whitespace() {
            match word.to_lowercase().as_str() {
                "bold" => self.bold = true,
                "italic" => self.italic = true,
                other => tracing::trace!("Ignoring unknown font style {:?}", other),
            }
        }
        self
    }
}

/// Remaps literal token values to another category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueOverride {
    pub values: Vec<String>,
    pub category: Category,
}

/// One configured category: format plus value overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleEntry {
    pub format: Option<TextFormat>,
    pub overrides: Vec<ValueOverride>,
}

#[derive(Debug, Clone, Default)]
struct StyleNode {
    parent: Option<String>,
    entry: Option<StyleEntry>,
}

/// Category path registry with display formats
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    nodes: HashMap<String, StyleNode>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `entry` for `category`, replacing any previous entry.
    ///
    /// Ancestors of `category` are registered as unstyled nodes.
    pub fn insert(&mut self, category: &Category, entry: StyleEntry) {
        let mut path = category.as_str();
        loop {
            let parent = parent_path(path);
            self.nodes.entry(path.to_owned()).or_insert_with(|| StyleNode {
                parent: parent.map(str::to_owned),
                entry: None,
            });
            match parent {
                Some(p) => path = p,
                None => break,
            }
        }

        if let Some(node) = self.nodes.get_mut(category.as_str()) {
            node.entry = Some(entry);
        }
    }

    /// Layer `entry` over the existing one: its format and overrides each
    /// replace the existing ones only when present.
    pub fn merge(&mut self, category: &Category, entry: StyleEntry) {
        let merged = match self.entry(category) {
            Some(existing) => StyleEntry {
                format: entry.format.or(existing.format),
                overrides: if entry.overrides.is_empty() {
                    existing.overrides.clone()
                } else {
                    entry.overrides
                },
            },
            None => entry,
        };
        self.insert(category, merged);
    }

    pub fn entry(&self, category: &Category) -> Option<&StyleEntry> {
        self.nodes
            .get(category.as_str())
            .and_then(|node| node.entry.as_ref())
    }

    pub fn len(&self) -> usize {
        self.nodes.values().filter(|n| n.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any value overrides are keyed by `category`
    pub fn has_overrides(&self, category: &Category) -> bool {
        self.entry(category).is_some_and(|e| !e.overrides.is_empty())
    }

    /// Category substituted for `value` by the overrides keyed by the exact
    /// raw category, if any rule lists the value
    pub fn override_for(&self, category: &Category, value: &str) -> Option<&Category> {
        self.entry(category)?
            .overrides
            .iter()
            .find(|rule| rule.values.iter().any(|v| v == value))
            .map(|rule| &rule.category)
    }

    /// Find the format for `category`, falling back through its ancestors.
    ///
    /// Unregistered paths are trimmed until they reach a registered node,
    /// then the registry's parent links are followed. `None` means default
    /// rendering.
    pub fn resolve_format(&self, category: &Category) -> Option<TextFormat> {
        let mut current = category
            .ancestors()
            .find(|path| self.nodes.contains_key(*path))
            .map(str::to_owned);

        while let Some(path) = current {
            let node = self.nodes.get(&path)?;
            if let Some(format) = node.entry.as_ref().and_then(|e| e.format) {
                return Some(format);
            }
            current = node.parent.clone();
        }

        None
    }
}
