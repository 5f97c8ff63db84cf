//! Cross-source symbol resolution
//!
//! Loads and analyzes the modules a document imports so names defined in
//! other files can be classified. Everything here is best effort: imports
//! that do not resolve, files that cannot be read and sources that do not
//! parse are skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::scope::{ScopeAnalyzer, ScopeTree, SymbolKind};

/// Maps an import name to a source file
pub trait ModuleResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, module: &str) -> Option<PathBuf>;
}

/// Resolves nothing; cross-source classification is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModules;

impl ModuleResolver for NoModules {
    fn resolve(&self, _module: &str) -> Option<PathBuf> {
        None
    }
}

/// Looks modules up under a list of root directories, in order.
///
/// `a.b` resolves to the first existing `<root>/a/b.py`,
/// `<root>/a/b/__init__.py` or `<root>/a/b.pyi`.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    roots: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Resolver rooted at the directory containing `file`, then `extra` roots
    pub fn for_file(file: &Path, extra: &[PathBuf]) -> Self {
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(std::iter::once(dir).chain(extra.iter().cloned()))
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ModuleResolver for SearchPathResolver {
    fn resolve(&self, module: &str) -> Option<PathBuf> {
        let parts: Vec<&str> = module.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        for root in &self.roots {
            let base = parts.iter().fold(root.clone(), |path, part| path.join(part));
            let candidates = [
                base.with_extension("py"),
                base.join("__init__.py"),
                base.with_extension("pyi"),
            ];
            if let Some(found) = candidates.into_iter().find(|c| c.is_file()) {
                return Some(found);
            }
        }

        None
    }
}

/// Scope trees of every successfully loaded imported module
#[derive(Debug, Clone, Default)]
pub struct ExternalScopes {
    modules: Vec<(String, ScopeTree)>,
}

impl ExternalScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve, read and analyze each module; failures are skipped
    pub fn load(
        modules: &[String],
        resolver: &dyn ModuleResolver,
        analyzer: &mut ScopeAnalyzer,
    ) -> Self {
        let mut loaded = Self::new();

        for module in modules {
            let Some(path) = resolver.resolve(module) else {
                tracing::debug!("Import {:?} did not resolve, skipping", module);
                continue;
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Could not read {} for {:?}: {}", path.display(), module, e);
                    continue;
                }
            };

            match analyzer.try_analyze(&source) {
                Some(analysis) => {
                    tracing::trace!("Loaded scopes for {:?} from {}", module, path.display());
                    loaded.insert(module.clone(), analysis.scopes);
                }
                None => {
                    tracing::warn!("{} does not parse, skipping {:?}", path.display(), module);
                }
            }
        }

        loaded
    }

    pub fn insert(&mut self, module: String, scopes: ScopeTree) {
        self.modules.retain(|(m, _)| *m != module);
        self.modules.push((module, scopes));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|(m, _)| m.as_str())
    }

    /// Distinct kinds the loaded modules give `name` at `line`
    pub fn candidates(&self, name: &str, line: usize) -> BTreeSet<SymbolKind> {
        self.modules
            .iter()
            .filter_map(|(_, scopes)| scopes.lookup(name, line))
            .collect()
    }

    /// The kind every module that knows `name` agrees on.
    ///
    /// `None` when no module knows it or when modules disagree.
    pub fn unanimous(&self, name: &str, line: usize) -> Option<SymbolKind> {
        let candidates = self.candidates(name, line);
        if candidates.len() == 1 {
            candidates.into_iter().next()
        } else {
            None
        }
    }
}
