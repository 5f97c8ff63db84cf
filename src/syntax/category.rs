//! Hierarchical token categories
//!
//! A category is a dot separated path such as `Punctuation.Bracket.Depth1`.
//! Its parent is the path with the last component removed; `Punctuation` has
//! no parent. Style lookups walk this chain from most to least specific.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot separated token category path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const TEXT: Category = Category::from_static("Text");
    pub const ERROR: Category = Category::from_static("Error");
    pub const KEYWORD: Category = Category::from_static("Keyword");
    pub const KEYWORD_CONSTANT: Category = Category::from_static("Keyword.Constant");
    pub const KEYWORD_TYPE: Category = Category::from_static("Keyword.Type");
    pub const NAME: Category = Category::from_static("Name");
    pub const NAME_BUILTIN: Category = Category::from_static("Name.Builtin");
    pub const NAME_BUILTIN_PSEUDO: Category = Category::from_static("Name.Builtin.Pseudo");
    pub const NAME_CLASS: Category = Category::from_static("Name.Class");
    pub const NAME_FUNCTION: Category = Category::from_static("Name.Function");
    pub const NAME_FUNCTION_MAGIC: Category = Category::from_static("Name.Function.Magic");
    pub const NAME_VARIABLE: Category = Category::from_static("Name.Variable");
    pub const NAME_CONSTANT: Category = Category::from_static("Name.Constant");
    pub const NAME_NAMESPACE: Category = Category::from_static("Name.Namespace");
    pub const NAME_TAG: Category = Category::from_static("Name.Tag");
    pub const NAME_ATTRIBUTE: Category = Category::from_static("Name.Attribute");
    pub const NAME_DECORATOR: Category = Category::from_static("Name.Decorator");
    pub const NAME_LABEL: Category = Category::from_static("Name.Label");
    pub const NAME_PROPERTY: Category = Category::from_static("Name.Property");
    pub const STRING: Category = Category::from_static("Literal.String");
    pub const STRING_ESCAPE: Category = Category::from_static("Literal.String.Escape");
    pub const STRING_OTHER: Category = Category::from_static("Literal.String.Other");
    pub const NUMBER: Category = Category::from_static("Literal.Number");
    pub const COMMENT: Category = Category::from_static("Comment");
    pub const OPERATOR: Category = Category::from_static("Operator");
    pub const OPERATOR_WORD: Category = Category::from_static("Operator.Word");
    pub const GENERIC_HEADING: Category = Category::from_static("Generic.Heading");
    pub const GENERIC_EMPH: Category = Category::from_static("Generic.Emph");
    pub const GENERIC_STRONG: Category = Category::from_static("Generic.Strong");
    pub const PUNCTUATION: Category = Category::from_static("Punctuation");
    pub const BRACKET: Category = Category::from_static("Punctuation.Bracket");
    pub const BRACKET_DEPTH_0: Category = Category::from_static("Punctuation.Bracket.Depth0");
    pub const BRACKET_DEPTH_1: Category = Category::from_static("Punctuation.Bracket.Depth1");
    pub const BRACKET_DEPTH_2: Category = Category::from_static("Punctuation.Bracket.Depth2");

    pub const fn from_static(path: &'static str) -> Self {
        Category(Cow::Borrowed(path))
    }

    /// Build a category from a runtime path, e.g. one read from a theme file.
    ///
    /// A leading `Token.` prefix is accepted and stripped.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.strip_prefix("Token.").map(str::to_owned).unwrap_or(path);
        Category(Cow::Owned(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The enclosing category, or `None` for a top level one
    pub fn parent(&self) -> Option<Category> {
        parent_path(&self.0).map(|p| Category(Cow::Owned(p.to_owned())))
    }

    /// This category followed by each of its ancestors, most specific first
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        std::iter::successors(Some(self.as_str()), |p| parent_path(*p))
    }

    /// Whether `self` is `other` or nested below it
    pub fn is_within(&self, other: &Category) -> bool {
        self.ancestors().any(|a| a == other.as_str())
    }
}

/// Strip the last path component
pub(crate) fn parent_path(path: &str) -> Option<&str> {
    path.rfind('.').map(|dot| &path[..dot])
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(path: &str) -> Self {
        Category::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chain() {
        let depth = Category::BRACKET_DEPTH_1;
        assert_eq!(depth.parent(), Some(Category::BRACKET));
        assert_eq!(Category::BRACKET.parent(), Some(Category::PUNCTUATION));
        assert_eq!(Category::PUNCTUATION.parent(), None);
    }

    #[test]
    fn test_ancestors_most_specific_first() {
        let pseudo = Category::NAME_BUILTIN_PSEUDO;
        let ancestors: Vec<&str> = pseudo.ancestors().collect();
        assert_eq!(ancestors, vec!["Name.Builtin.Pseudo", "Name.Builtin", "Name"]);
    }

    #[test]
    fn test_token_prefix_is_stripped() {
        assert_eq!(Category::new("Token.Name.Class"), Category::NAME_CLASS);
    }

    #[test]
    fn test_is_within() {
        assert!(Category::STRING_ESCAPE.is_within(&Category::STRING));
        assert!(Category::NAME.is_within(&Category::NAME));
        assert!(!Category::NAME.is_within(&Category::NAME_CLASS));
    }
}
