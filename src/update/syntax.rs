//! Syntax tokenization update handlers
//!
//! Handles syntax-related messages for the Elm architecture: fallback
//! highlighting of edited lines, debounce bookkeeping, background launches
//! and the generation-guarded cache swap.

use std::sync::Arc;

use crate::commands::Cmd;
use crate::messages::SyntaxMsg;
use crate::model::{EngineModel, RenderMode};
use crate::syntax::{highlight_line, LineCache, TokenizeJob};

/// Handle syntax-related messages
pub fn update_syntax(model: &mut EngineModel, msg: SyntaxMsg) -> Option<Cmd> {
    match msg {
        SyntaxMsg::TextChanged {
            position,
            chars_removed,
            chars_added,
        } => {
            model.document.revision += 1;
            let revision = model.document.revision;

            let (start, end) = model.document.line_range(position, chars_added);
            let line_count = model.document.line_count();
            let lines_shifted = line_count != model.highlight.known_lines;
            model.highlight.known_lines = line_count;

            model
                .highlight
                .invalidate_fallback(start, end, lines_shifted);
            model.highlight.mode = RenderMode::Fallback;

            let mut lexer = model.document.grammar.lexer();
            for line in start..=end {
                if let Some(text) = model.document.line_text(line) {
                    let spans = highlight_line(&mut lexer, &text);
                    model.highlight.fallback.insert(line, spans);
                }
            }

            tracing::debug!(
                "Text changed at {} (-{} +{}): rev {}, fallback lines {}..={}{}",
                position,
                chars_removed,
                chars_added,
                revision,
                start,
                end,
                if lines_shifted { ", lines shifted" } else { "" }
            );

            model.highlight.pending_revision = Some(revision);
            Some(Cmd::DebouncedTokenize {
                revision,
                delay_ms: model.highlight.debounce_ms,
            })
        }

        SyntaxMsg::ParseReady { revision } => {
            // Skip if the text changed since the timer was armed
            if model.document.revision != revision {
                tracing::debug!(
                    "Skipping stale parse request: doc revision {} != request revision {}",
                    model.document.revision,
                    revision
                );
                return None;
            }

            // A forced run already covers this revision
            if model.highlight.pending_revision != Some(revision) {
                tracing::debug!("No pending request for revision {}, ignoring", revision);
                return None;
            }

            Some(launch_tokenize(model))
        }

        SyntaxMsg::ParseCompleted { generation, cache } => {
            model.highlight.in_flight.remove(&generation);
            apply_result(model, generation, cache)
        }

        SyntaxMsg::GrammarChanged { grammar } => {
            tracing::debug!(
                "Grammar changed {:?} -> {:?}",
                model.document.language(),
                grammar.language()
            );
            model.document.grammar = grammar;
            model.highlight.styles = Arc::new(model.theme.style_table(model.document.language()));

            // Old spans belong to another grammar
            model.highlight.cache = None;
            model.highlight.fallback.clear();
            model.highlight.mode = RenderMode::Fallback;

            Some(launch_tokenize(model))
        }

        SyntaxMsg::StyleChanged { theme } => {
            tracing::debug!("Style table changed to theme {:?}", theme.name);
            model.theme = *theme;
            model.highlight.styles = Arc::new(model.theme.style_table(model.document.language()));
            // The cache applied the old theme's value overrides
            model.highlight.mode = RenderMode::Fallback;
            Some(launch_tokenize(model))
        }

        SyntaxMsg::ForceRecompute => Some(launch_tokenize(model)),
    }
}

/// Start a background run for the current text right away.
///
/// Claims a new generation and clears any pending debounce request, since
/// this run covers the current revision.
pub fn launch_tokenize(model: &mut EngineModel) -> Cmd {
    model.highlight.pending_revision = None;
    let generation = model.highlight.next_generation();
    let revision = model.document.revision;

    tracing::debug!(
        "Launching tokenizer generation {} for rev {} ({:?})",
        generation,
        revision,
        model.document.language()
    );

    Cmd::RunTokenize(Box::new(TokenizeJob {
        generation,
        revision,
        text: model.document.snapshot(),
        grammar: model.document.grammar.clone(),
        styles: Arc::clone(&model.highlight.styles),
        resolver: Arc::clone(&model.resolver),
    }))
}

fn apply_result(model: &mut EngineModel, generation: u64, cache: LineCache) -> Option<Cmd> {
    let latest = model.highlight.latest_generation;
    if generation != latest {
        tracing::debug!(
            "Discarding superseded result: generation {} != latest {}",
            generation,
            latest
        );
        return None;
    }

    let revision = cache.revision();
    let current = revision == model.document.revision;
    model.highlight.cache = Some(Arc::new(cache));

    if current {
        model.highlight.mode = RenderMode::Cached;
        model.highlight.fallback.clear();
    }

    tracing::debug!(
        "Swapped in cache generation {} (rev {}, doc rev {}), mode {:?}",
        generation,
        revision,
        model.document.revision,
        model.highlight.mode
    );

    Some(Cmd::CacheSwapped {
        generation,
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{DocumentMsg, Msg};
    use crate::model::{Document, SchedulerPhase};
    use crate::syntax::{Category, Grammar, LanguageId};
    use crate::theme::Theme;
    use crate::update::update;

    fn python_model(text: &str) -> EngineModel {
        let mut doc = Document::with_text(text);
        doc.grammar = Grammar::for_language(LanguageId::Python);
        EngineModel::new(doc, Theme::default_dark(), 1000)
    }

    fn take_job(cmd: Option<Cmd>) -> TokenizeJob {
        match cmd {
            Some(Cmd::RunTokenize(job)) => *job,
            other => panic!("Expected RunTokenize, got {:?}", other),
        }
    }

    fn complete(model: &mut EngineModel, job: &TokenizeJob) -> Option<Cmd> {
        update_syntax(
            model,
            SyntaxMsg::ParseCompleted {
                generation: job.generation,
                cache: job.run(),
            },
        )
    }

    #[test]
    fn test_text_changed_arms_debounce() {
        let mut model = python_model("x = 1\n");
        let cmd = update(&mut model, Msg::replace(4, 1, "2"));

        match cmd {
            Some(Cmd::DebouncedTokenize { revision, delay_ms }) => {
                assert_eq!(revision, 1);
                assert_eq!(delay_ms, 1000);
            }
            other => panic!("Expected DebouncedTokenize, got {:?}", other),
        }
        assert_eq!(model.highlight.phase(), SchedulerPhase::Pending);
        assert_eq!(model.highlight.mode, RenderMode::Fallback);
        assert!(model.highlight.fallback.contains_key(&0));
    }

    #[test]
    fn test_stale_parse_ready_is_skipped() {
        let mut model = python_model("x = 1\n");
        update(&mut model, Msg::replace(0, 0, "a"));
        update(&mut model, Msg::replace(0, 0, "b"));

        // The first timer fires after the second edit
        assert!(update_syntax(&mut model, SyntaxMsg::ParseReady { revision: 1 }).is_none());
        assert_eq!(model.highlight.latest_generation, 0);

        let job = take_job(update_syntax(&mut model, SyntaxMsg::ParseReady { revision: 2 }));
        assert_eq!(job.generation, 1);
        assert_eq!(job.revision, 2);
        assert_eq!(&*job.text, "bax = 1\n");
        assert_eq!(model.highlight.phase(), SchedulerPhase::Running);

        // Duplicate timer for an already launched revision
        assert!(update_syntax(&mut model, SyntaxMsg::ParseReady { revision: 2 }).is_none());
    }

    #[test]
    fn test_completion_swaps_cache() {
        let mut model = python_model("class A:\n    pass\n");
        let job = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));

        let cmd = complete(&mut model, &job);
        assert!(matches!(
            cmd,
            Some(Cmd::CacheSwapped {
                generation: 1,
                revision: 0
            })
        ));
        assert_eq!(model.highlight.mode, RenderMode::Cached);
        assert_eq!(model.highlight.phase(), SchedulerPhase::Idle);

        let spans = model.spans_for_line(0);
        let class = spans.iter().find(|s| s.text == "A").unwrap();
        assert_eq!(class.category, Category::NAME_CLASS);
    }

    #[test]
    fn test_older_generation_is_discarded() {
        let mut model = python_model("x = 1\n");
        let first = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));

        update(&mut model, Msg::replace(0, 0, "class X:\n    pass\n"));
        let second = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));
        assert_eq!((first.generation, second.generation), (1, 2));

        assert!(complete(&mut model, &second).is_some());
        assert!(complete(&mut model, &first).is_none());

        let cache = model.highlight.cache.clone().unwrap();
        assert_eq!(cache.generation(), 2);
        assert_eq!(cache.line_text(0), "class X:");
        assert_eq!(model.highlight.mode, RenderMode::Cached);
    }

    #[test]
    fn test_result_for_old_revision_keeps_fallback_mode() {
        let mut model = python_model("x = 1\n");
        let job = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));

        // Edit while the run is in flight
        update(&mut model, Msg::replace(0, 1, "yy"));
        assert_eq!(model.highlight.phase(), SchedulerPhase::Pending);

        assert!(complete(&mut model, &job).is_some());
        assert_eq!(model.highlight.mode, RenderMode::Fallback);
        assert!(model.highlight.cache.is_some());
        // The pending cycle survives the completion
        assert_eq!(model.highlight.phase(), SchedulerPhase::Pending);

        let spans = model.spans_for_line(0);
        assert_eq!(spans[0].text, "yy");
    }

    #[test]
    fn test_fallback_served_before_cache() {
        let mut model = python_model("a = (1)\nb = 2\n");
        let job = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));
        complete(&mut model, &job);

        update(&mut model, Msg::replace(4, 3, "[(1)]"));

        let spans = model.spans_for_line(0);
        let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "a = [(1)]");
        assert!(spans
            .iter()
            .filter(|s| s.text == "(" || s.text == "[")
            .all(|s| s.category == Category::BRACKET));

        // Untouched line still served from the stale cache
        let line1 = model.spans_for_line(1);
        assert_eq!(line1[0].category, Category::NAME_VARIABLE);
    }

    #[test]
    fn test_line_shift_drops_following_fallback_spans() {
        let mut model = python_model("a\nb\nc\n");
        update(&mut model, Msg::replace(4, 1, "cc"));
        assert!(model.highlight.fallback.contains_key(&2));

        update(&mut model, Msg::replace(0, 0, "z\n"));
        assert!(!model.highlight.fallback.contains_key(&2));
        assert!(model.highlight.fallback.contains_key(&0));
        assert!(model.highlight.fallback.contains_key(&1));

        assert_eq!(model.spans_for_line(3)[0].text, "cc");
    }

    #[test]
    fn test_style_change_triggers_recompute() {
        let mut model = python_model("self\n");
        let light = Theme::from_builtin("github-light").unwrap();
        let job = take_job(update_syntax(
            &mut model,
            SyntaxMsg::StyleChanged {
                theme: Box::new(light),
            },
        ));
        assert_eq!(model.theme.name, "GitHub Light");
        assert!(Arc::ptr_eq(&job.styles, &model.highlight.styles));
    }

    #[test]
    fn test_style_change_demotes_cache_until_rerun() {
        let mut model = python_model("len(x)\n");
        let job = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));
        complete(&mut model, &job);
        assert_eq!(model.highlight.mode, RenderMode::Cached);
        let len = |model: &EngineModel| model.spans_for_line(0)[0].category.clone();
        assert_eq!(len(&model), Category::NAME_FUNCTION);

        let light = Theme::from_builtin("github-light").unwrap();
        let job = take_job(update_syntax(
            &mut model,
            SyntaxMsg::StyleChanged {
                theme: Box::new(light),
            },
        ));
        assert_eq!(model.highlight.mode, RenderMode::Fallback);
        assert_eq!(model.highlight.phase(), SchedulerPhase::Running);

        complete(&mut model, &job);
        assert_eq!(model.highlight.mode, RenderMode::Cached);
        assert_eq!(len(&model), Category::NAME_BUILTIN);
    }

    #[test]
    fn test_grammar_change_clears_cache() {
        let mut model = python_model("x = 1\n");
        let job = take_job(update_syntax(&mut model, SyntaxMsg::ForceRecompute));
        complete(&mut model, &job);
        assert!(model.highlight.cache.is_some());

        let job = take_job(update_syntax(
            &mut model,
            SyntaxMsg::GrammarChanged {
                grammar: Grammar::plain_text(),
            },
        ));
        assert!(model.highlight.cache.is_none());
        assert_eq!(model.highlight.mode, RenderMode::Fallback);
        assert_eq!(job.grammar.language(), LanguageId::PlainText);
        assert_eq!(model.spans_for_line(0)[0].category, Category::TEXT);
    }

    #[test]
    fn test_empty_edit_is_ignored() {
        let mut model = python_model("x\n");
        assert!(update(
            &mut model,
            Msg::Document(DocumentMsg::Replace {
                position: 0,
                chars_removed: 0,
                text: String::new(),
            })
        )
        .is_none());
        assert_eq!(model.document.revision, 0);
    }
}
