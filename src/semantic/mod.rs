//! Semantic name classification
//!
//! Scope analysis of the current document and of the modules it imports.
//! Used by the background tokenizer to refine plain `Name` tokens into
//! classes, functions, variables, constants and namespaces.

mod resolver;
mod scope;

pub use resolver::{ExternalScopes, ModuleResolver, NoModules, SearchPathResolver};
pub use scope::{Scope, ScopeAnalyzer, ScopeId, ScopeTree, SourceAnalysis, SymbolKind};
