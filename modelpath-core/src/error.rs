//! Error types for modelpath operations

use thiserror::Error;

/// Lexical errors raised while tokenizing a path string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at position {position} in '{source_text}'")]
    UnexpectedCharacter {
        character: char,
        position: usize,
        source_text: String,
    },

    #[error("Unterminated string starting with {quote} at position {position} in '{source_text}'")]
    UnterminatedString {
        quote: char,
        position: usize,
        source_text: String,
    },

    #[error("Invalid escape '\\{character}' at position {position} in '{source_text}'")]
    InvalidEscape {
        character: char,
        position: usize,
        source_text: String,
    },
}

impl LexError {
    /// Character offset the error points at.
    pub fn position(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position, .. }
            | LexError::InvalidEscape { position, .. } => *position,
        }
    }
}

/// Syntax errors raised while parsing a token stream into a path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected token {token} '{text}' at position {position} in path '{path}'")]
    UnexpectedToken {
        token: String,
        text: String,
        position: usize,
        path: String,
    },

    #[error("Unexpected end of input in path '{path}'")]
    UnexpectedEnd { path: String },

    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
}

/// Errors raised while walking a parsed path over a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraversalError {
    #[error("Expected Map at '{segment}', found {found}")]
    ExpectedMap { segment: String, found: String },

    #[error("Expected List at '{segment}', found {found}")]
    ExpectedList { segment: String, found: String },

    #[error("Cannot put through non-unique filter '{segment}'")]
    NonUniquePut { segment: String },

    #[error("List filter '{segment}' is not supported by this operation")]
    FilterNotSupported { segment: String },

    #[error("Missing intermediate value at '{segment}' and auto-vivification is disabled")]
    MissingIntermediate { segment: String },

    #[error("Visitor has no focus: a previous step failed or the path was already applied")]
    Exhausted,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed configuration: {reason}")]
    Malformed { reason: String },
}

/// Master error type for all modelpath errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelPathError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Traversal error: {0}")]
    Traversal(#[from] TraversalError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<LexError> for ModelPathError {
    fn from(e: LexError) -> Self {
        ModelPathError::Parse(ParseError::Lex(e))
    }
}

/// Result type alias for modelpath operations.
pub type ModelPathResult<T> = Result<T, ModelPathError>;

// =============================================================================
// TESTS
// =============================================================================
