//! Theme system
//!
//! Provides YAML/JSON theme files with compile-time embedded themes and
//! user-defined themes from the config directory.
//!
//! A theme is a set of sections keyed by language display name (`Python`,
//! `Rust`, ...) plus a base `Text` section applied to every language. Each
//! section maps category paths to a foreground color, font style and value
//! overrides:
//!
//! ```yaml
//! name: Monokai
//! Text:
//!   Comment: { foreground: "#75715e", font_style: italic }
//! Python:
//!   Name.Builtin:
//!     replace:
//!       - [[print, len], Name.Function]
//! ```
//!
//! Theme loading priority:
//! 1. User config: `<config dir>/lumen/themes/{id}.yaml` (or `.yml`, `.json`)
//! 2. Embedded: Built-in themes compiled into binary

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_paths;
use crate::syntax::{Category, LanguageId, StyleEntry, StyleTable, TextFormat, ValueOverride};

// Embed theme YAML files at compile time
pub const MONOKAI_YAML: &str = include_str!("../themes/monokai.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../themes/github-light.yaml");

/// Section applied to every language
pub const BASE_SECTION: &str = "Text";

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "monokai")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "monokai",
        yaml: MONOKAI_YAML,
    },
    BuiltinTheme {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
];

const THEME_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Load a theme from a YAML or JSON file (chosen by extension)
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    if path.extension().is_some_and(|ext| ext == "json") {
        Theme::from_json(&content)
    } else {
        Theme::from_yaml(&content)
    }
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = config_paths::themes_dir() {
        for ext in THEME_EXTENSIONS {
            let user_path = user_dir.join(format!("{}.{}", id, ext));
            if user_path.exists() {
                tracing::info!("Loading user theme from {}", user_path.display());
                return from_file(&user_path);
            }
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let hex = s.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("Invalid color {}: {}", s, e))
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#rrggbb" (alpha omitted when opaque)
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Raw theme data as parsed from YAML/JSON
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThemeData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub author: Option<String>,
    /// Section name → category path → style
    #[serde(flatten)]
    pub sections: BTreeMap<String, BTreeMap<String, StyleData>>,
}

/// One category's style, as written in the theme file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StyleData {
    #[serde(default, alias = "Foreground")]
    pub foreground: Option<String>,
    #[serde(default, alias = "FontStyle")]
    pub font_style: Option<String>,
    /// `[[values...], category]` pairs
    #[serde(default, alias = "Replace")]
    pub replace: Vec<(Vec<String>, String)>,
}

impl StyleData {
    fn resolve(&self) -> Result<StyleEntry, String> {
        let format = if self.foreground.is_some() || self.font_style.is_some() {
            let foreground = self
                .foreground
                .as_deref()
                .map(Color::from_hex)
                .transpose()?;
            let format = TextFormat {
                foreground,
                ..TextFormat::default()
            };
            Some(match &self.font_style {
                Some(style) => format.with_font_style(style),
                None => format,
            })
        } else {
            None
        };

        let overrides = self
            .replace
            .iter()
            .map(|(values, category)| ValueOverride {
                values: values.clone(),
                category: Category::new(category.as_str()),
            })
            .collect();

        Ok(StyleEntry { format, overrides })
    }
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub name: String,
    pub author: Option<String>,
    sections: BTreeMap<String, Vec<(Category, StyleEntry)>>,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load theme from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to a resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let mut sections = BTreeMap::new();
        for (section, styles) in data.sections {
            let mut entries = Vec::with_capacity(styles.len());
            for (path, style) in styles {
                let entry = style
                    .resolve()
                    .map_err(|e| format!("{} / {}: {}", section, path, e))?;
                entries.push((Category::new(path), entry));
            }
            sections.insert(section, entries);
        }

        Ok(Theme {
            name: data.name.unwrap_or_else(|| "Untitled".to_string()),
            author: data.author,
            sections,
        })
    }

    /// Default theme (embedded Monokai, or an empty theme if that fails)
    pub fn default_dark() -> Self {
        Theme::from_yaml(MONOKAI_YAML).unwrap_or_else(|e| {
            tracing::error!("Embedded theme failed to parse: {}", e);
            Theme {
                name: "Plain".to_string(),
                ..Theme::default()
            }
        })
    }

    /// Entries of a section, matched case-insensitively
    fn section(&self, name: &str) -> Option<&[(Category, StyleEntry)]> {
        self.sections
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, entries)| entries.as_slice())
    }

    /// Effective style table for a language: the base section with the
    /// language's section layered on top
    pub fn style_table(&self, language: LanguageId) -> StyleTable {
        let mut table = StyleTable::new();

        for (category, entry) in self.section(BASE_SECTION).unwrap_or(&[]) {
            table.insert(category, entry.clone());
        }

        let name = language.display_name();
        if name != BASE_SECTION {
            for (category, entry) in self.section(name).unwrap_or(&[]) {
                table.merge(category, entry.clone());
            }
        }

        tracing::debug!(
            "Style table for {:?} from theme {:?}: {} entries",
            language,
            self.name,
            table.len()
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#a6e22e"), Ok(Color::rgb(0xa6, 0xe2, 0x2e)));
        assert_eq!(
            Color::from_hex("FF000080"),
            Ok(Color::rgba(0xff, 0x00, 0x00, 0x80))
        );
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("#ééé").is_err());
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_builtins_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml)
                .unwrap_or_else(|e| panic!("{} failed: {}", builtin.id, e));
            assert!(!theme.name.is_empty());
            assert!(theme.section(BASE_SECTION).is_some(), "{}", builtin.id);
        }
    }

    #[test]
    fn test_language_section_wins() {
        let theme = Theme::from_yaml(
            r##"
name: Test
Text:
  Keyword: { foreground: "#111111", font_style: bold }
  Comment: { foreground: "#222222" }
Python:
  Keyword: { foreground: "#333333" }
"##,
        )
        .unwrap();

        let python = theme.style_table(LanguageId::Python);
        let keyword = python.resolve_format(&Category::KEYWORD).unwrap();
        assert_eq!(keyword.foreground, Some(Color::rgb(0x33, 0x33, 0x33)));
        assert!(!keyword.bold);
        assert!(python.resolve_format(&Category::COMMENT).is_some());

        let rust = theme.style_table(LanguageId::Rust);
        let keyword = rust.resolve_format(&Category::KEYWORD).unwrap();
        assert_eq!(keyword.foreground, Some(Color::rgb(0x11, 0x11, 0x11)));
        assert!(keyword.bold);
    }

    #[test]
    fn test_json_with_capitalized_keys() {
        let theme = Theme::from_json(
            r##"{
                "Text": { "Token.Comment": { "Foreground": "#75715e", "FontStyle": "italic" } },
                "Python": { "Name": { "Replace": [[["self", "cls"], "Name.Builtin.Pseudo"]] } }
            }"##,
        )
        .unwrap();
        assert_eq!(theme.name, "Untitled");

        let table = theme.style_table(LanguageId::Python);
        assert!(table.resolve_format(&Category::COMMENT).unwrap().italic);
        assert_eq!(
            table.override_for(&Category::NAME, "cls"),
            Some(&Category::NAME_BUILTIN_PSEUDO)
        );
    }

    #[test]
    fn test_bad_color_names_location() {
        let err = Theme::from_yaml("Text:\n  Keyword: { foreground: red }\n").unwrap_err();
        assert!(err.contains("Text / Keyword"), "{}", err);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(Theme::from_builtin("does-not-exist").is_err());
    }
}
