//! Canonical printer for path ASTs
//!
//! `Display` output re-parses to an equal [`Path`] whenever
//! [`Path::is_printable`] holds. Keys and values are written bare when they
//! lex as a single identifier, and double-quoted otherwise.

use crate::parser::*;
use std::borrow::Cow;
use std::fmt;

/// Render a key or value so the lexer reads it back unchanged.
///
/// A string ending in a backslash has no quoted spelling, since the closing
/// quote would be read as escaped.
pub fn quote_identifier(text: &str) -> Cow<'_, str> {
    if is_bare_identifier(text) {
        if text.contains('.') {
            Cow::Owned(text.replace('.', "\\."))
        } else {
            Cow::Borrowed(text)
        }
    } else {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\\\"")))
    }
}

/// Whether [`quote_identifier`] output reads back as `text`.
pub fn has_spelling(text: &str) -> bool {
    is_bare_identifier(text) || !text.ends_with('\\')
}

fn is_bare_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '.' || is_start(first)) && chars.all(|c| c == '.' || c == '-' || is_start(c))
}

fn is_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '@')
}

impl ListFilter {
    pub fn is_printable(&self) -> bool {
        has_spelling(self.key())
            && self.property().map_or(true, has_spelling)
            && has_spelling(self.value())
    }
}

impl PathExpression {
    pub fn is_printable(&self) -> bool {
        match self {
            PathExpression::MapKey { key } => has_spelling(key),
            PathExpression::ListFilter(filter) => filter.is_printable(),
        }
    }
}

impl Path {
    /// Whether the `Display` form of this path parses back to it. A key,
    /// property or value ending in a backslash has no such form.
    pub fn is_printable(&self) -> bool {
        self.iter().all(PathExpression::is_printable)
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = self.delimiter();
        write!(f, "{}{}", quote_identifier(self.key()), delimiter.open())?;
        if let Some(property) = self.property() {
            let op = if self.is_unique() { "=" } else { "*=" };
            write!(f, "{}{}", quote_identifier(property), op)?;
        }
        write!(f, "{}{}", quote_identifier(self.value()), delimiter.close())
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpression::MapKey { key } => f.write_str(&quote_identifier(key)),
            PathExpression::ListFilter(filter) => filter.fmt(f),
        }
    }
}

/// Writes the canonical text. For a path that is not
/// [`is_printable`](Path::is_printable) the text is written anyway and will
/// not parse back to the same path.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expression) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            expression.fmt(f)?;
        }
        Ok(())
    }
}
