//! Lexer implementation

use super::token::*;
use modelpath_core::LexError;
use std::iter::Peekable;
use std::str::Chars;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Lexer for path expressions.
///
/// Yields tokens one at a time and ends with a single EOF token. After EOF or
/// the first error the lexer is exhausted and cannot be restarted.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            pos: 0,
            finished: false,
        }
    }

    /// Tokenize the remaining source into a vector of tokens.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.pos;

        match self.peek_char() {
            None => Ok(Token::new(TokenKind::Eof, "", Span { start, end: start })),
            Some(c) => {
                if let Some(kind) = TokenKind::from_punctuation(c) {
                    self.advance();
                    return Ok(Token::new(kind, c.to_string(), self.span_from(start)));
                }
                match c {
                    '"' | '\'' => self.scan_string(c),
                    c if is_identifier_start(c) || c == '\\' => self.scan_identifier(),
                    c => Err(LexError::UnexpectedCharacter {
                        character: c,
                        position: start,
                        source_text: self.source.to_string(),
                    }),
                }
            }
        }
    }

    /// Scan an identifier, unescaping `\.` into a literal dot.
    fn scan_identifier(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut value = String::new();

        while let Some(c) = self.peek_char() {
            if c == '\\' {
                let escape_pos = self.pos;
                self.advance();
                match self.peek_char() {
                    Some('.') => {
                        self.advance();
                        value.push('.');
                    }
                    Some(other) => {
                        return Err(LexError::InvalidEscape {
                            character: other,
                            position: escape_pos,
                            source_text: self.source.to_string(),
                        })
                    }
                    None => {
                        return Err(LexError::UnexpectedCharacter {
                            character: '\\',
                            position: escape_pos,
                            source_text: self.source.to_string(),
                        })
                    }
                }
            } else if (value.is_empty() && is_identifier_start(c))
                || (!value.is_empty() && is_identifier_part(c))
            {
                self.advance();
                value.push(c);
            } else {
                break;
            }
        }

        Ok(Token::new(TokenKind::Identifier, value, self.span_from(start)))
    }

    /// Scan a quoted string. A backslash escapes only the matching quote.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => {
                    return Err(LexError::UnterminatedString {
                        quote,
                        position: start,
                        source_text: self.source.to_string(),
                    })
                }
                Some('\\') => {
                    self.advance();
                    if self.peek_char() == Some(quote) {
                        self.advance();
                        value.push(quote);
                    } else {
                        value.push('\\');
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(Token::new(TokenKind::String, value, self.span_from(start)))
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            start,
            end: self.pos,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += 1;
        Some(c)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.is_eof() => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

fn is_identifier_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '@')
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c == '-'
}

/// Tokenize a whole path string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_lexing_ends_with_single_eof(source in "[a-z0-9_.\\[\\]{}=* '\"]{0,40}") {
            if let Ok(tokens) = tokenize(&source) {
                prop_assert!(tokens.last().is_some_and(Token::is_eof));
                prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
            }
        }

        #[test]
        fn prop_lexer_never_panics(source in "\\PC{0,40}") {
            let _ = tokenize(&source);
        }
    }
}
