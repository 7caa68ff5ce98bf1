//! Parser implementation
//!
//! A backtracking parser over the production tables in [`super::grammar`].
//! Before each production attempt the parser takes a [`Mark`] of its token
//! cursor and AST stack depth, and resets to it when the attempt fails.

use super::ast::*;
use super::grammar::*;
use crate::lexer::*;
use modelpath_core::ParseError;
use tracing::trace;

// ============================================================================
// PARSER
// ============================================================================

/// Saved parser state: token cursor plus AST stack depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub pos: usize,
    pub depth: usize,
}

/// Parser for path expressions.
pub struct Parser {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    stack: Vec<AstNode>,
    furthest_failure: Option<usize>,
}

impl Parser {
    /// Create a new parser from a vector of tokens.
    ///
    /// `source` is the original path string, used in error messages. A
    /// missing trailing EOF token is supplied.
    pub fn new(mut tokens: Vec<Token>, source: impl Into<String>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, "", Span { start: end, end }));
        }
        Self {
            tokens,
            source: source.into(),
            pos: 0,
            stack: Vec::new(),
            furthest_failure: None,
        }
    }

    /// Lex `source` and create a parser over its tokens.
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        Ok(Self::new(tokens, source))
    }

    /// Parse the tokens into a Path.
    pub fn parse(&mut self) -> Result<Path, ParseError> {
        let start = self.mark();
        if self.match_non_terminal(NonTerminal::Path) && self.current().is_eof() {
            if let Some(AstNode::Path(path)) = self.stack.pop() {
                return Ok(path);
            }
        }
        self.reset(start);
        Err(self.error())
    }

    /// Current parser state.
    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            depth: self.stack.len(),
        }
    }

    /// Restore a previously taken state, discarding AST nodes pushed since.
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.stack.truncate(mark.depth);
    }

    /// Try each production of `non_terminal` in order; first match wins.
    fn match_non_terminal(&mut self, non_terminal: NonTerminal) -> bool {
        for production in non_terminal.productions() {
            let mark = self.mark();
            trace!(production = production.name, pos = mark.pos, "trying production");
            if self.match_production(production, mark) {
                return true;
            }
            trace!(production = production.name, pos = mark.pos, "backtracking");
            self.reset(mark);
        }
        false
    }

    fn match_production(&mut self, production: &Production, mark: Mark) -> bool {
        if !self.match_symbols(production.symbols) {
            return false;
        }

        let nodes = self.stack.split_off(mark.depth);
        match (production.reduce)(nodes) {
            Some(node) => {
                self.stack.push(node);
                true
            }
            None => false,
        }
    }

    fn match_symbols(&mut self, symbols: &[Symbol]) -> bool {
        symbols.iter().all(|symbol| match *symbol {
            Symbol::Terminal(kind) => self.match_terminal(kind),
            Symbol::NonTerminal(non_terminal) => self.match_non_terminal(non_terminal),
            Symbol::Repeat(group) => {
                self.match_repeat(group);
                true
            }
        })
    }

    /// Match `group` as many times as it matches in full. A partial match is
    /// reset, leaving the cursor after the last complete repetition.
    fn match_repeat(&mut self, group: &[Symbol]) {
        loop {
            let mark = self.mark();
            if !self.match_symbols(group) {
                trace!(pos = mark.pos, "repetition ends");
                self.reset(mark);
                return;
            }
            if self.pos == mark.pos {
                return;
            }
        }
    }

    fn match_terminal(&mut self, kind: TokenKind) -> bool {
        let token = self.current();
        if token.kind != kind {
            self.note_failure();
            return false;
        }
        if matches!(kind, TokenKind::Identifier | TokenKind::String) {
            let text = token.value.clone();
            self.stack.push(AstNode::Text(text));
        }
        self.advance();
        true
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    fn note_failure(&mut self) {
        if self.furthest_failure.map_or(true, |f| self.pos > f) {
            self.furthest_failure = Some(self.pos);
        }
    }

    /// Error describing the furthest token no production could consume.
    fn error(&self) -> ParseError {
        let last = self.tokens.len().saturating_sub(1);
        let index = self.furthest_failure.unwrap_or(self.pos).min(last);
        let token = &self.tokens[index];
        if token.is_eof() {
            ParseError::UnexpectedEnd {
                path: self.source.clone(),
            }
        } else {
            ParseError::UnexpectedToken {
                token: token.kind.name().to_string(),
                text: token.value.clone(),
                position: token.span.start,
                path: self.source.clone(),
            }
        }
    }
}

// ============================================================================
// CONVENIENCE FUNCTIONS
// ============================================================================

/// Parse a path string into a [`Path`].
pub fn parse_path(source: &str) -> Result<Path, ParseError> {
    Parser::from_source(source)?.parse()
}

/// Parse and print a path in canonical form.
pub fn round_trip(source: &str) -> Result<String, ParseError> {
    Ok(parse_path(source)?.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modelpath_core::LexError;

    fn key(k: &str) -> PathExpression {
        PathExpression::map_key(k)
    }

    #[test]
    fn test_parse_simple_keys() -> Result<(), ParseError> {
        let path = parse_path("a.b.c")?;
        assert_eq!(path, Path::new(vec![key("a"), key("b"), key("c")]));
        Ok(())
    }

    #[test]
    fn test_parse_unique_filter() -> Result<(), ParseError> {
        let path = parse_path("items[id=42]")?;
        assert_eq!(
            path,
            Path::from(PathExpression::from(ListFilter::unique("items", "id", "42")))
        );
        Ok(())
    }

    #[test]
    fn test_parse_non_unique_filter_brace_form() -> Result<(), ParseError> {
        let path = parse_path("a.b[c=d].e{f*=g}")?;
        assert_eq!(path.len(), 3);
        assert_eq!(path.expressions()[0], key("a"));
        assert_eq!(
            path.expressions()[1],
            ListFilter::unique("b", "c", "d").into()
        );
        assert_eq!(
            path.expressions()[2],
            ListFilter::all("e", "f", "g")
                .with_delimiter(FilterDelimiter::Brace)
                .into()
        );
        Ok(())
    }

    #[test]
    fn test_parse_default_property_filter() -> Result<(), ParseError> {
        let path = parse_path("links[AD].attributes{memberOf}")?;
        assert_eq!(
            path.expressions()[0],
            ListFilter::by_default_property("links", "AD").into()
        );
        assert_eq!(
            path.expressions()[1],
            ListFilter::by_default_property("attributes", "memberOf")
                .with_delimiter(FilterDelimiter::Brace)
                .into()
        );
        Ok(())
    }

    #[test]
    fn test_parse_strings_and_whitespace() -> Result<(), ParseError> {
        let path = parse_path(r#" links [ "display name" = 'Active Directory' ] . "x.y" "#)?;
        assert_eq!(
            path.expressions()[0],
            ListFilter::unique("links", "display name", "Active Directory").into()
        );
        assert_eq!(path.expressions()[1], key("x.y"));
        Ok(())
    }

    #[test]
    fn test_parse_escaped_dot_identifier() -> Result<(), ParseError> {
        let path = parse_path(r"attributes.cn\.name")?;
        assert_eq!(path, Path::new(vec![key("attributes"), key("cn.name")]));
        Ok(())
    }

    #[test]
    fn test_parse_deep_path_without_recursion() -> Result<(), ParseError> {
        let source = vec!["k"; 20_000].join(".");
        let path = parse_path(&source)?;
        assert_eq!(path.len(), 20_000);
        assert!(path.iter().all(|e| *e == key("k")));
        Ok(())
    }

    #[test]
    fn test_parse_trailing_dot_is_unexpected_end() {
        let err = parse_path("a.b.").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEnd {
                path: "a.b.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_empty_is_unexpected_end() {
        assert!(matches!(
            parse_path(""),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_parse_reports_furthest_unexpected_token() {
        let err = parse_path("a[b=]").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                token: "CLOSE_BRACKET".to_string(),
                text: "]".to_string(),
                position: 4,
                path: "a[b=]".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_mismatched_delimiters() {
        let err = parse_path("a[b=c}").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref token, position: 5, .. } if token == "CLOSE_BRACE"
        ));
    }

    #[test]
    fn test_parse_asterisk_without_equals() {
        let err = parse_path("a[b*c]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { position: 4, .. }
        ));
    }

    #[test]
    fn test_parse_trailing_tokens() {
        let err = parse_path("a b").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref text, position: 2, .. } if text == "b"
        ));
    }

    #[test]
    fn test_parse_surfaces_lexer_errors() {
        let err = parse_path("a.b#c").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnexpectedCharacter {
                character: '#',
                position: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_parser_supplies_missing_eof() -> Result<(), ParseError> {
        let tokens = vec![Token::new(
            TokenKind::Identifier,
            "a",
            Span { start: 0, end: 1 },
        )];
        let path = Parser::new(tokens, "a").parse()?;
        assert_eq!(path, Path::from(key("a")));
        Ok(())
    }

    #[test]
    fn test_mark_and_reset_restore_state() -> Result<(), ParseError> {
        let mut parser = Parser::from_source("a.b")?;
        let start = parser.mark();
        assert_eq!(start, Mark { pos: 0, depth: 0 });
        assert!(parser.match_terminal(TokenKind::Identifier));
        assert_eq!(parser.mark(), Mark { pos: 1, depth: 1 });
        parser.reset(start);
        assert_eq!(parser.mark(), start);
        Ok(())
    }

    #[test]
    fn test_failed_parse_leaves_clean_stack() {
        let mut parser = Parser::from_source("a[b").unwrap();
        assert!(parser.parse().is_err());
        assert_eq!(parser.mark(), Mark { pos: 0, depth: 0 });
    }

    #[test]
    fn test_round_trip_canonicalizes() -> Result<(), ParseError> {
        assert_eq!(round_trip(" a . b [ c = 'd' ] ")?, "a.b[c=d]");
        Ok(())
    }
}
