//! Fuzz test for the path lexer
//!
//! Feeds arbitrary UTF-8 to the lexer looking for panics and runaway loops.
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use modelpath_dsl::{Lexer, TokenKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let char_count = input.chars().count();

        match Lexer::new(input).tokenize() {
            Ok(tokens) => {
                // Exactly one Eof, and it is last
                let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
                assert_eq!(eofs, 1, "exactly one Eof token");
                assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));

                for token in &tokens {
                    assert!(token.span.start <= token.span.end, "span start <= end");
                    assert!(token.span.end <= char_count, "span inside the source");
                }
            }
            Err(err) => {
                assert!(err.position() < char_count, "error points into the source");
            }
        }

        // The iterator form stops after the first error or Eof
        let mut lexer = Lexer::new(input);
        for item in lexer.by_ref() {
            if item.is_err() {
                break;
            }
        }
        assert!(lexer.next().is_none(), "lexer is fused");
    }
});
