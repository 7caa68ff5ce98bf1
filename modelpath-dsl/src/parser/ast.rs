//! AST types for parsed paths

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ============================================================================
// PATH EXPRESSIONS
// ============================================================================

/// Delimiters a list filter was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterDelimiter {
    /// `key[...]`
    #[default]
    Bracket,
    /// `key{...}`
    Brace,
}

impl FilterDelimiter {
    pub fn open(&self) -> char {
        match self {
            FilterDelimiter::Bracket => '[',
            FilterDelimiter::Brace => '{',
        }
    }

    pub fn close(&self) -> char {
        match self {
            FilterDelimiter::Bracket => ']',
            FilterDelimiter::Brace => '}',
        }
    }
}

/// Selects elements of the list held at `key` whose property equals `value`.
///
/// Without an explicit property the configured default properties are
/// consulted (`sysName`, then `name`). A default-property filter is always
/// unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListFilter {
    key: String,
    property: Option<String>,
    value: String,
    unique: bool,
    delimiter: FilterDelimiter,
}

impl ListFilter {
    /// `key[value]`: unique match on the default properties.
    pub fn by_default_property(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            property: None,
            value: value.into(),
            unique: true,
            delimiter: FilterDelimiter::Bracket,
        }
    }

    /// `key[property=value]`: unique match on an explicit property.
    pub fn unique(
        key: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            property: Some(property.into()),
            value: value.into(),
            unique: true,
            delimiter: FilterDelimiter::Bracket,
        }
    }

    /// `key[property*=value]`: every match, as a list.
    pub fn all(
        key: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            property: Some(property.into()),
            value: value.into(),
            unique: false,
            delimiter: FilterDelimiter::Bracket,
        }
    }

    /// Same filter, written with the given delimiters.
    pub fn with_delimiter(mut self, delimiter: FilterDelimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn delimiter(&self) -> FilterDelimiter {
        self.delimiter
    }
}

/// One addressing step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathExpression {
    /// A single key of a map, projected across elements when applied to a list.
    MapKey { key: String },
    /// A filtered view of a list-valued key.
    ListFilter(ListFilter),
}

impl PathExpression {
    pub fn map_key(key: impl Into<String>) -> Self {
        PathExpression::MapKey { key: key.into() }
    }

    /// The map key this expression reads, for both variants.
    pub fn key(&self) -> &str {
        match self {
            PathExpression::MapKey { key } => key,
            PathExpression::ListFilter(filter) => filter.key(),
        }
    }
}

impl From<ListFilter> for PathExpression {
    fn from(filter: ListFilter) -> Self {
        PathExpression::ListFilter(filter)
    }
}

// ============================================================================
// PATH
// ============================================================================

/// A parsed sequence of path expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    expressions: Vec<PathExpression>,
}

impl Path {
    pub fn new(expressions: Vec<PathExpression>) -> Self {
        Self { expressions }
    }

    /// Parse a path string.
    pub fn parse(source: &str) -> Result<Self, modelpath_core::ParseError> {
        crate::parser::parse_path(source)
    }

    pub fn expressions(&self) -> &[PathExpression] {
        &self.expressions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathExpression> {
        self.expressions.iter()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn last(&self) -> Option<&PathExpression> {
        self.expressions.last()
    }

    /// Add one expression at the end.
    pub fn push(&mut self, expression: impl Into<PathExpression>) {
        self.expressions.push(expression.into());
    }

    /// Append the expressions of `other` to this path.
    pub fn append(&mut self, other: &Path) {
        self.expressions.extend(other.expressions.iter().cloned());
    }

    /// Consume both paths, returning `self` followed by `other`.
    pub fn join(mut self, other: Path) -> Path {
        self.expressions.extend(other.expressions);
        self
    }

    /// The path without its last expression, or `None` for an empty path.
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.expressions.split_last()?;
        Some(Path::new(init.to_vec()))
    }
}

impl From<PathExpression> for Path {
    fn from(expression: PathExpression) -> Self {
        Path::new(vec![expression])
    }
}

impl FromIterator<PathExpression> for Path {
    fn from_iter<I: IntoIterator<Item = PathExpression>>(iter: I) -> Self {
        Path::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathExpression;
    type IntoIter = std::slice::Iter<'a, PathExpression>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.iter()
    }
}

impl FromStr for Path {
    type Err = modelpath_core::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Serializes as the canonical path string. Fails for a path that is not
/// [`is_printable`](Path::is_printable), since that string would not
/// deserialize back.
impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_printable() {
            return Err(serde::ser::Error::custom(
                "path has a key or value ending in a backslash and no printable form",
            ));
        }
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Path::parse(&source).map_err(serde::de::Error::custom)
    }
}
