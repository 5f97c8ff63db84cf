//! Command-line argument parsing
//!
//! Tokenizes one file and prints it either ANSI colored or as JSON spans.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::EngineConfig;

/// Syntax and semantic highlighter
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Syntax and semantic highlighter")]
pub struct CliArgs {
    /// File to highlight
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Theme id (overrides config)
    #[arg(short = 't', long, value_name = "ID")]
    pub theme: Option<String>,

    /// Grammar hint: language name, extension or file name
    #[arg(short = 'l', long, value_name = "HINT")]
    pub language: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Ansi)]
    pub format: OutputFormat,

    /// Extra directory to search for imported modules (repeatable)
    #[arg(short = 'm', long = "module-path", value_name = "DIR")]
    pub module_paths: Vec<PathBuf>,

    /// Store the effective theme and module paths as the new defaults
    #[arg(long)]
    pub save_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored text for a terminal
    Ansi,
    /// Array of lines, each an array of spans
    Json,
}

/// Everything one run needs, with config defaults applied
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub theme: String,
    /// Explicit hint, or the file name
    pub grammar_hint: String,
    pub format: OutputFormat,
    /// CLI paths first, then configured ones
    pub module_paths: Vec<PathBuf>,
    /// Configuration to persist before highlighting, if requested
    pub save: Option<EngineConfig>,
}

impl CliArgs {
    /// Merge parsed CLI args with the persisted configuration
    pub fn into_config(self, config: &EngineConfig) -> Result<RunConfig, String> {
        if self.file.is_dir() {
            return Err(format!("{} is a directory", self.file.display()));
        }

        let grammar_hint = match self.language {
            Some(hint) => hint,
            None => self.file.to_string_lossy().into_owned(),
        };

        let mut module_paths = self.module_paths;
        for path in &config.module_paths {
            if !module_paths.contains(path) {
                module_paths.push(path.clone());
            }
        }

        let theme = self.theme.unwrap_or_else(|| config.theme.clone());
        let save = self.save_config.then(|| EngineConfig {
            theme: theme.clone(),
            debounce_ms: config.debounce_ms,
            module_paths: module_paths.clone(),
        });

        Ok(RunConfig {
            file: self.file,
            theme,
            grammar_hint,
            format: self.format,
            module_paths,
            save,
        })
    }
}
