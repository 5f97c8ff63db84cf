use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use lumen::cli::{CliArgs, OutputFormat};
use lumen::config::EngineConfig;
use lumen::config_paths;
use lumen::output::{write_ansi, write_json};
use lumen::semantic::SearchPathResolver;
use lumen::theme::{load_theme, Theme};
use lumen::{Highlighter, RenderMode};

/// Upper bound on a single tokenizer run
const RUN_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    lumen::tracing::init();

    let args = CliArgs::parse();
    let config = EngineConfig::load();
    let run = args.into_config(&config).map_err(anyhow::Error::msg)?;

    if let Some(saved) = &run.save {
        let path = config_paths::config_file().context("No config directory available")?;
        saved.save_to(&path).map_err(anyhow::Error::msg)?;
    }

    let theme = load_theme(&run.theme).unwrap_or_else(|e| {
        tracing::warn!("Failed to load theme '{}': {}, using default", run.theme, e);
        Theme::default_dark()
    });

    let text = std::fs::read_to_string(&run.file)
        .with_context(|| format!("Failed to read {}", run.file.display()))?;
    let resolver = SearchPathResolver::for_file(&run.file, &run.module_paths);
    tracing::debug!("Module search roots: {:?}", resolver.roots());

    let mut highlighter = Highlighter::new(&text, theme)
        .with_resolver(Arc::new(resolver))
        .with_debounce(config.debounce_ms);
    highlighter.set_grammar(&run.grammar_hint);

    if !highlighter.wait_idle(RUN_TIMEOUT) || highlighter.render_mode() != RenderMode::Cached {
        bail!("Tokenizing {} did not finish", run.file.display());
    }

    let mut line_count = highlighter.document().line_count();
    if text.ends_with('\n') {
        line_count -= 1;
    }
    let lines: Vec<_> = (0..line_count)
        .map(|line| highlighter.spans_for_line(line))
        .collect();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match run.format {
        OutputFormat::Ansi => write_ansi(&mut out, lines, &highlighter.model().highlight.styles)?,
        OutputFormat::Json => write_json(&mut out, &lines)?,
    }
    out.flush()?;

    Ok(())
}
