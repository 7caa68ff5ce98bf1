//! Lexer token types

use std::fmt;

// ============================================================================
// LEXER TYPES
// ============================================================================

/// Token kinds of the path language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Equals,
    Asterisk,
    Dot,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Identifier,
    String,
    Eof,
}

impl TokenKind {
    /// Kind for a single-character token, if `c` is one.
    pub fn from_punctuation(c: char) -> Option<Self> {
        match c {
            '=' => Some(TokenKind::Equals),
            '*' => Some(TokenKind::Asterisk),
            '.' => Some(TokenKind::Dot),
            '[' => Some(TokenKind::OpenBracket),
            ']' => Some(TokenKind::CloseBracket),
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            _ => None,
        }
    }

    /// Upper-case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Equals => "EQUALS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Dot => "DOT",
            TokenKind::OpenBracket => "OPEN_BRACKET",
            TokenKind::CloseBracket => "CLOSE_BRACKET",
            TokenKind::OpenBrace => "OPEN_BRACE",
            TokenKind::CloseBrace => "CLOSE_BRACE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source location span, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A token with its kind, value and source location.
///
/// `value` is the unescaped text for identifiers and strings, the character
/// itself for punctuation, and empty for EOF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "{}@{}", self.kind, self.span.start),
            _ => write!(f, "{}({:?})@{}", self.kind, self.value, self.span.start),
        }
    }
}
