//! modelpath DSL - path expression lexer, parser and printer
//!
//! Paths address values inside nested map/list structures, for example
//! `links[AD].attributes.memberOf` or `a.b[c=d].e{f*=g}`.
//!
//! Architecture:
//! ```text
//! Path string
//!     ↓
//! Lexer (tokens, ends with EOF)
//!     ↓
//! Parser (backtracking over grammar productions)
//!     ↓
//! Path AST (MapKey / ListFilter expressions)
//!     ↓
//! Canonical printer (Display, for round-trip testing)
//! ```

pub mod lexer;
pub mod parser;
pub mod pretty_printer;

// Re-export key types for convenience
pub use lexer::*;
pub use parser::*;
pub use pretty_printer::quote_identifier;
