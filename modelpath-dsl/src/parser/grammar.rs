//! Grammar productions for the path language
//!
//! ```text
//! Path     -> PathExpr ('.' PathExpr)*
//! PathExpr -> IdExpr '[' IdExpr '*' '=' IdExpr ']'
//!           | IdExpr '{' IdExpr '*' '=' IdExpr '}'
//!           | IdExpr '[' IdExpr '=' IdExpr ']'
//!           | IdExpr '{' IdExpr '=' IdExpr '}'
//!           | IdExpr '[' IdExpr ']'
//!           | IdExpr '{' IdExpr '}'
//!           | IdExpr
//! IdExpr   -> IDENTIFIER | STRING
//! ```
//!
//! Productions are tried in declaration order and the first one that matches
//! wins, so longer alternatives come first. The `( ... )*` group is matched
//! in a loop rather than by recursion, so path length does not grow the
//! call stack.

use super::ast::*;
use crate::lexer::TokenKind;

/// Values held on the parser's AST stack.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Text of a matched IDENTIFIER or STRING token.
    Text(String),
    Expression(PathExpression),
    Path(Path),
}

/// Non-terminals of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTerminal {
    Path,
    PathExpression,
    IdentifierExpression,
}

impl NonTerminal {
    pub fn name(&self) -> &'static str {
        match self {
            NonTerminal::Path => "Path",
            NonTerminal::PathExpression => "PathExpression",
            NonTerminal::IdentifierExpression => "IdentifierExpression",
        }
    }

    /// Productions of this non-terminal, in the order they are tried.
    pub fn productions(&self) -> &'static [Production] {
        match self {
            NonTerminal::Path => PATH,
            NonTerminal::PathExpression => PATH_EXPRESSION,
            NonTerminal::IdentifierExpression => IDENTIFIER_EXPRESSION,
        }
    }
}

/// A grammar symbol: a token kind to consume, a non-terminal to expand, or
/// a group matched zero or more times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
    Repeat(&'static [Symbol]),
}

/// Builds one AST node from the nodes its symbols pushed, in order.
pub type Reduce = fn(Vec<AstNode>) -> Option<AstNode>;

/// One alternative of a non-terminal.
#[derive(Debug)]
pub struct Production {
    pub name: &'static str,
    pub symbols: &'static [Symbol],
    pub reduce: Reduce,
}

// ============================================================================
// PRODUCTION TABLES
// ============================================================================

use NonTerminal as N;
use Symbol::{NonTerminal as Nt, Repeat, Terminal as T};
use TokenKind as K;

const ID: Symbol = Nt(N::IdentifierExpression);

static PATH: &[Production] = &[Production {
    name: "Path -> PathExpr ('.' PathExpr)*",
    symbols: &[
        Nt(N::PathExpression),
        Repeat(&[T(K::Dot), Nt(N::PathExpression)]),
    ],
    reduce: reduce_path,
}];

static PATH_EXPRESSION: &[Production] = &[
    Production {
        name: "PathExpr -> IdExpr '[' IdExpr '*=' IdExpr ']'",
        symbols: &[
            ID,
            T(K::OpenBracket),
            ID,
            T(K::Asterisk),
            T(K::Equals),
            ID,
            T(K::CloseBracket),
        ],
        reduce: reduce_all_bracket,
    },
    Production {
        name: "PathExpr -> IdExpr '{' IdExpr '*=' IdExpr '}'",
        symbols: &[
            ID,
            T(K::OpenBrace),
            ID,
            T(K::Asterisk),
            T(K::Equals),
            ID,
            T(K::CloseBrace),
        ],
        reduce: reduce_all_brace,
    },
    Production {
        name: "PathExpr -> IdExpr '[' IdExpr '=' IdExpr ']'",
        symbols: &[ID, T(K::OpenBracket), ID, T(K::Equals), ID, T(K::CloseBracket)],
        reduce: reduce_unique_bracket,
    },
    Production {
        name: "PathExpr -> IdExpr '{' IdExpr '=' IdExpr '}'",
        symbols: &[ID, T(K::OpenBrace), ID, T(K::Equals), ID, T(K::CloseBrace)],
        reduce: reduce_unique_brace,
    },
    Production {
        name: "PathExpr -> IdExpr '[' IdExpr ']'",
        symbols: &[ID, T(K::OpenBracket), ID, T(K::CloseBracket)],
        reduce: reduce_default_bracket,
    },
    Production {
        name: "PathExpr -> IdExpr '{' IdExpr '}'",
        symbols: &[ID, T(K::OpenBrace), ID, T(K::CloseBrace)],
        reduce: reduce_default_brace,
    },
    Production {
        name: "PathExpr -> IdExpr",
        symbols: &[ID],
        reduce: reduce_map_key,
    },
];

static IDENTIFIER_EXPRESSION: &[Production] = &[
    Production {
        name: "IdExpr -> IDENTIFIER",
        symbols: &[T(K::Identifier)],
        reduce: reduce_text,
    },
    Production {
        name: "IdExpr -> STRING",
        symbols: &[T(K::String)],
        reduce: reduce_text,
    },
];

// ============================================================================
// REDUCE ACTIONS
// ============================================================================

fn reduce_path(nodes: Vec<AstNode>) -> Option<AstNode> {
    let expressions = nodes
        .into_iter()
        .map(|node| match node {
            AstNode::Expression(expression) => Some(expression),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    if expressions.is_empty() {
        return None;
    }
    Some(AstNode::Path(Path::new(expressions)))
}

fn reduce_all_bracket(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_filter(nodes, false, FilterDelimiter::Bracket)
}

fn reduce_all_brace(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_filter(nodes, false, FilterDelimiter::Brace)
}

fn reduce_unique_bracket(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_filter(nodes, true, FilterDelimiter::Bracket)
}

fn reduce_unique_brace(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_filter(nodes, true, FilterDelimiter::Brace)
}

fn reduce_default_bracket(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_default_filter(nodes, FilterDelimiter::Bracket)
}

fn reduce_default_brace(nodes: Vec<AstNode>) -> Option<AstNode> {
    reduce_default_filter(nodes, FilterDelimiter::Brace)
}

fn reduce_filter(
    nodes: Vec<AstNode>,
    unique: bool,
    delimiter: FilterDelimiter,
) -> Option<AstNode> {
    let [AstNode::Text(key), AstNode::Text(property), AstNode::Text(value)]: [AstNode; 3] =
        nodes.try_into().ok()?
    else {
        return None;
    };
    let filter = if unique {
        ListFilter::unique(key, property, value)
    } else {
        ListFilter::all(key, property, value)
    };
    Some(AstNode::Expression(filter.with_delimiter(delimiter).into()))
}

fn reduce_default_filter(nodes: Vec<AstNode>, delimiter: FilterDelimiter) -> Option<AstNode> {
    let [AstNode::Text(key), AstNode::Text(value)]: [AstNode; 2] = nodes.try_into().ok()? else {
        return None;
    };
    Some(AstNode::Expression(
        ListFilter::by_default_property(key, value)
            .with_delimiter(delimiter)
            .into(),
    ))
}

fn reduce_map_key(nodes: Vec<AstNode>) -> Option<AstNode> {
    let [AstNode::Text(key)]: [AstNode; 1] = nodes.try_into().ok()? else {
        return None;
    };
    Some(AstNode::Expression(PathExpression::MapKey { key }))
}

fn reduce_text(nodes: Vec<AstNode>) -> Option<AstNode> {
    let [node @ AstNode::Text(_)]: [AstNode; 1] = nodes.try_into().ok()? else {
        return None;
    };
    Some(node)
}
