//! Parser module for path expressions

pub mod ast;
pub mod grammar;
pub mod parser;

pub use ast::*;
pub use grammar::{AstNode, NonTerminal, Production, Symbol};
pub use parser::*;
