#![allow(dead_code)]

use webconf_rs::{parse_str, Config, ParseError, ParseErrorKind};

/// Parse input that must succeed.
pub fn parse_ok(input: &str) -> Config {
    parse_str(input).unwrap_or_else(|e| {
        panic!("expected successful parse, got: {e}\n--- input ---\n{input}")
    })
}

/// Parse input that must fail; returns the error.
pub fn parse_err(input: &str) -> ParseError {
    match parse_str(input) {
        Ok(_) => panic!("expected parse failure\n--- input ---\n{input}"),
        Err(e) => e,
    }
}

/// Assert the input fails with the given kind and an error message
/// containing `needle`; returns the error for further inspection.
pub fn assert_error(input: &str, kind: ParseErrorKind, needle: &str) -> ParseError {
    let err = parse_err(input);
    assert_eq!(err.kind, kind, "wrong error kind for: {err}");
    assert!(
        err.to_string().contains(needle),
        "error {:?} does not contain {needle:?}",
        err.to_string()
    );
    err
}
