//! Lexer module for path expressions

pub mod scanner;
pub mod token;

pub use scanner::*;
pub use token::*;
