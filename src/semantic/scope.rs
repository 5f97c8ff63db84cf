//! Scope analysis for Python sources
//!
//! Builds a tree of lexical scopes (module, class, function) with a symbol
//! table per scope, plus the document's import bookkeeping. Lines are
//! 0-indexed. Sources that fail to parse produce a root-only tree.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tree_sitter::{Node, Parser};

/// What a name was bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SymbolKind {
    Class,
    Function,
    Variable,
}

/// Index of a scope within its [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A line-range bounded symbol table
#[derive(Debug, Clone)]
pub struct Scope {
    pub start_line: usize,
    pub end_line: usize,
    pub symbols: HashMap<String, SymbolKind>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
            symbols: HashMap::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }
}

/// All scopes of one source unit; index 0 is the module scope
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::root_only()
    }
}

impl ScopeTree {
    /// A module scope spanning every line, with no symbols
    pub fn root_only() -> Self {
        Self {
            scopes: vec![Scope::new(None, 0, usize::MAX)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn push_child(&mut self, parent: ScopeId, start_line: usize, end_line: usize) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent), start_line, end_line));
        self.scopes[parent.0].children.push(id);
        id
    }

    fn define(&mut self, scope: ScopeId, name: &str, kind: SymbolKind) {
        self.scopes[scope.0].symbols.insert(name.to_owned(), kind);
    }

    /// The deepest scope whose range contains `line`
    pub fn innermost(&self, line: usize) -> Option<ScopeId> {
        let mut current = self.root();
        if !self.scope(current).contains(line) {
            return None;
        }

        while let Some(child) = self
            .scope(current)
            .children
            .iter()
            .copied()
            .find(|c| self.scope(*c).contains(line))
        {
            current = child;
        }

        Some(current)
    }

    /// Resolve `name` as seen from `line`: innermost scope first, then outward
    pub fn lookup(&self, name: &str, line: usize) -> Option<SymbolKind> {
        let mut scope = self.innermost(line);
        while let Some(id) = scope {
            let current = self.scope(id);
            if let Some(kind) = current.symbols.get(name) {
                return Some(*kind);
            }
            scope = current.parent;
        }
        None
    }
}

/// Scope tree plus import bookkeeping for one source unit
#[derive(Debug, Clone, Default)]
pub struct SourceAnalysis {
    pub scopes: ScopeTree,
    /// Imported module names, in first-seen order
    pub modules: Vec<String>,
    /// Names bound by import statements
    pub imported: HashSet<String>,
}

impl SourceAnalysis {
    pub fn lookup(&self, name: &str, line: usize) -> Option<SymbolKind> {
        self.scopes.lookup(name, line)
    }

    pub fn is_imported(&self, name: &str) -> bool {
        self.imported.contains(name)
    }

    fn add_module(&mut self, module: &str) {
        if !self.modules.iter().any(|m| m == module) {
            self.modules.push(module.to_owned());
        }
    }
}

/// Reusable Python scope analyzer
pub struct ScopeAnalyzer {
    parser: Option<Parser>,
}

impl Default for ScopeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeAnalyzer {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let parser = match parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
            Ok(()) => Some(parser),
            Err(e) => {
                tracing::error!("Failed to set Python language for scope analysis: {}", e);
                None
            }
        };
        Self { parser }
    }

    /// Analyze `source`, degrading to a root-only result on parse failure
    pub fn analyze(&mut self, source: &str) -> SourceAnalysis {
        self.try_analyze(source).unwrap_or_default()
    }

    /// Analyze `source`, or `None` if it does not parse cleanly
    pub fn try_analyze(&mut self, source: &str) -> Option<SourceAnalysis> {
        let tree = self.parser.as_mut()?.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("Source has syntax errors, skipping scope analysis");
            return None;
        }

        let mut collector = Collector {
            source,
            analysis: SourceAnalysis::default(),
        };
        let module = collector.analysis.scopes.root();
        collector.visit_children(root, module);
        Some(collector.analysis)
    }
}

struct Collector<'s> {
    source: &'s str,
    analysis: SourceAnalysis,
}

impl<'s> Collector<'s> {
    fn text(&self, node: Node) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn visit_children(&mut self, node: Node, scope: ScopeId) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, scope);
        }
    }

    fn visit(&mut self, node: Node, scope: ScopeId) {
        match node.kind() {
            "class_definition" => self.visit_definition(node, scope, SymbolKind::Class),
            "function_definition" => self.visit_definition(node, scope, SymbolKind::Function),
            "assignment" => {
                if let Some(target) = node.child_by_field_name("left") {
                    self.bind_target(target, scope);
                }
                self.visit_children(node, scope);
            }
            "import_statement" => self.visit_import(node),
            "import_from_statement" => self.visit_import_from(node),
            _ => self.visit_children(node, scope),
        }
    }

    /// Record the definition in the enclosing scope, then open its own scope
    fn visit_definition(&mut self, node: Node, scope: ScopeId, kind: SymbolKind) {
        if let Some(name) = node.child_by_field_name("name") {
            let name = self.text(name);
            self.analysis.scopes.define(scope, name, kind);
        }

        let inner = self.analysis.scopes.push_child(
            scope,
            node.start_position().row,
            node.end_position().row,
        );
        self.visit_children(node, inner);
    }

    /// Bind every plain name in an assignment target as a variable
    fn bind_target(&mut self, target: Node, scope: ScopeId) {
        match target.kind() {
            "identifier" => {
                let name = self.text(target);
                self.analysis.scopes.define(scope, name, SymbolKind::Variable);
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern" => {
                let mut cursor = target.walk();
                for child in target.named_children(&mut cursor) {
                    self.bind_target(child, scope);
                }
            }
            // Attribute and subscript targets bind nothing new
            _ => {}
        }
    }

    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "dotted_name" => {
                    let module = self.text(child);
                    self.analysis.add_module(module);
                    // `import a.b` binds `a`
                    let bound = module.split('.').next().unwrap_or(module);
                    self.analysis.imported.insert(bound.to_owned());
                }
                "aliased_import" => {
                    let Some(module) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let module = self.text(module);
                    self.analysis.add_module(module);
                    let bound = child
                        .child_by_field_name("alias")
                        .map(|alias| self.text(alias))
                        .unwrap_or(module);
                    self.analysis.imported.insert(bound.to_owned());
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&mut self, node: Node) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = match module.kind() {
            "dotted_name" => Some(module),
            // `from .pkg import x` names `pkg`; bare `from . import x` names nothing
            "relative_import" => {
                let mut cursor = module.walk();
                let dotted = module
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "dotted_name");
                dotted
            }
            _ => None,
        };
        let Some(module) = module else {
            return;
        };
        let module = self.text(module);
        self.analysis.add_module(module);

        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            let bound = match child.kind() {
                "dotted_name" => Some(self.text(child)),
                "aliased_import" => child
                    .child_by_field_name("alias")
                    .or_else(|| child.child_by_field_name("name"))
                    .map(|n| self.text(n)),
                _ => None,
            };
            if let Some(bound) = bound {
                self.analysis.imported.insert(bound.to_owned());
            }
        }
    }
}
