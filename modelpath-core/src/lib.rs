//! modelpath Core - shared types
//!
//! Error taxonomy, configuration and value helpers used by the lexer/parser
//! crate and the visitor crate. Contains no parsing or traversal logic.

pub mod config;
pub mod error;
pub mod value;

pub use config::*;
pub use error::*;
pub use value::*;
