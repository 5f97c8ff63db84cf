//! Language identification and detection
//!
//! Maps file names, extensions and explicit hints to language IDs. Anything
//! unrecognised resolves to plain text; resolution never fails.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Python,
    Rust,
    JavaScript,
    TypeScript,
    Tsx,
    Json,
    Toml,
    Yaml,
    Markdown,
    Html,
    Css,
    Go,
    Php,
    C,
    Cpp,
    Java,
    Bash,
    Scheme,
    Ini,
    Xml,
}

/// Every language with a lexical grammar, in display order
pub const ALL_LANGUAGES: &[LanguageId] = &[
    LanguageId::PlainText,
    LanguageId::Python,
    LanguageId::Rust,
    LanguageId::JavaScript,
    LanguageId::TypeScript,
    LanguageId::Tsx,
    LanguageId::Json,
    LanguageId::Toml,
    LanguageId::Yaml,
    LanguageId::Markdown,
    LanguageId::Html,
    LanguageId::Css,
    LanguageId::Go,
    LanguageId::Php,
    LanguageId::C,
    LanguageId::Cpp,
    LanguageId::Java,
    LanguageId::Bash,
    LanguageId::Scheme,
    LanguageId::Ini,
    LanguageId::Xml,
];

impl LanguageId {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" | "pyi" => LanguageId::Python,
            "rs" => LanguageId::Rust,
            "js" | "mjs" | "cjs" | "jsx" => LanguageId::JavaScript,
            "ts" | "mts" | "cts" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "json" | "jsonc" => LanguageId::Json,
            "toml" => LanguageId::Toml,
            "yaml" | "yml" => LanguageId::Yaml,
            "md" | "markdown" => LanguageId::Markdown,
            "html" | "htm" => LanguageId::Html,
            "css" => LanguageId::Css,
            "go" => LanguageId::Go,
            "php" => LanguageId::Php,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            "sh" | "bash" | "zsh" => LanguageId::Bash,
            "scm" | "ss" | "rkt" => LanguageId::Scheme,
            "ini" | "cfg" => LanguageId::Ini,
            "xml" | "svg" | "plist" => LanguageId::Xml,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    ///
    /// A handful of well-known extensionless file names are recognised too.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        match file_name {
            "Cargo.lock" | "Pipfile" => return LanguageId::Toml,
            ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" => return LanguageId::Bash,
            _ => {}
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Detect language from a language name ("python", "C++", "text")
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.display_name().to_lowercase() == wanted)
            .or(match wanted.as_str() {
                "text" | "plain" | "txt" => Some(LanguageId::PlainText),
                "js" => Some(LanguageId::JavaScript),
                "ts" => Some(LanguageId::TypeScript),
                "sh" | "shell" => Some(LanguageId::Bash),
                "racket" => Some(LanguageId::Scheme),
                "py" => Some(LanguageId::Python),
                "rs" => Some(LanguageId::Rust),
                _ => None,
            })
    }

    /// Resolve a file name, path, bare extension or language name.
    ///
    /// Unknown hints fall back to plain text.
    pub fn from_hint(hint: &str) -> Self {
        if let Some(lang) = Self::from_name(hint) {
            return lang;
        }

        let by_path = Self::from_path(Path::new(hint));
        if by_path != LanguageId::PlainText {
            return by_path;
        }

        let bare = hint.trim_start_matches("*.").trim_start_matches('.');
        let by_ext = Self::from_extension(bare);
        if by_ext == LanguageId::PlainText {
            tracing::debug!("No grammar for hint {:?}, using plain text", hint);
        }
        by_ext
    }

    /// Get display name for the language
    ///
    /// This is also the name of the theme section holding language specific
    /// styles.
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Text",
            LanguageId::Python => "Python",
            LanguageId::Rust => "Rust",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Tsx => "TSX",
            LanguageId::Json => "JSON",
            LanguageId::Toml => "TOML",
            LanguageId::Yaml => "YAML",
            LanguageId::Markdown => "Markdown",
            LanguageId::Html => "HTML",
            LanguageId::Css => "CSS",
            LanguageId::Go => "Go",
            LanguageId::Php => "PHP",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
            LanguageId::Scheme => "Scheme",
            LanguageId::Ini => "INI",
            LanguageId::Xml => "XML",
        }
    }

    /// Check if this language has a structural grammar
    pub fn has_grammar(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }

    /// Check if names in this language are classified by scope analysis
    pub fn has_semantics(&self) -> bool {
        matches!(self, LanguageId::Python)
    }
}
