//! Lexer edge cases and error tests.

use webconf_rs::{tokenize, ParseErrorKind, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .expect("tokenize")
        .iter()
        .map(|t| t.kind)
        .collect()
}

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn lex_only_whitespace_and_comments() {
    assert_eq!(kinds("   \t \r\n # c\n // c\n /* c */ "), vec![TokenKind::Eof]);
}

#[test]
fn lex_server_block_shape() {
    assert_eq!(
        kinds("server { listen 8080; }"),
        vec![
            TokenKind::Server,
            TokenKind::LBrace,
            TokenKind::Listen,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_every_keyword() {
    let input = "server location listen host root index autoindex methods \
                 upload_store return error_page client_max_body_size cgi_extension";
    assert_eq!(
        kinds(input),
        vec![
            TokenKind::Server,
            TokenKind::Location,
            TokenKind::Listen,
            TokenKind::Host,
            TokenKind::Root,
            TokenKind::Index,
            TokenKind::Autoindex,
            TokenKind::Methods,
            TokenKind::UploadStore,
            TokenKind::Return,
            TokenKind::ErrorPage,
            TokenKind::ClientMaxBodySize,
            TokenKind::CgiExtension,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_keyword_lexeme_preserves_case() {
    let tokens = tokenize("LISTEN Upload_Store").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Listen);
    assert_eq!(tokens[0].text, "LISTEN");
    assert_eq!(tokens[1].kind, TokenKind::UploadStore);
    assert_eq!(tokens[1].text, "Upload_Store");
}

#[test]
fn lex_identifier_charset() {
    let tokens = tokenize("/.well-known/acme-challenge host:8080 _x a.b").expect("tokenize");
    assert_eq!(tokens.len(), 5);
    assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Identifier));
    assert_eq!(tokens[0].text, "/.well-known/acme-challenge");
    assert_eq!(tokens[1].text, "host:8080");
}

#[test]
fn lex_no_silently_dropped_content() {
    // Every non-blank byte lands in some token lexeme.
    let input = "server{listen 8080;root /a;}";
    let tokens = tokenize(input).expect("tokenize");
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join("");
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(rebuilt, stripped);
}

// -----------------------------------------------------------
// Numbers and the IPv4 heuristic.
// -----------------------------------------------------------

#[test]
fn lex_plain_number() {
    let tokens = tokenize("65535").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].text, "65535");
}

#[test]
fn lex_number_with_each_unit() {
    for unit in ["k", "K", "m", "M", "g", "G"] {
        let input = format!("10{unit}");
        let tokens = tokenize(&input).expect("tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, input);
    }
}

#[test]
fn lex_two_letter_suffix_fails() {
    let err = tokenize("10mb").expect_err("should fail");
    assert_eq!(err.kind, ParseErrorKind::Tokenizer);
    assert!(err
        .to_string()
        .contains("Invalid number suffix: expected single letter like 'k', 'm', or 'g'"));
}

#[test]
fn lex_ipv4_is_identifier() {
    let tokens = tokenize("127.0.0.1 10.0.0.0:80").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "127.0.0.1");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].text, "10.0.0.0:80");
}

#[test]
fn lex_digit_then_identifier_char_is_identifier() {
    let tokens = tokenize("1index.html").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "1index.html");
}

// -----------------------------------------------------------
// Strings.
// -----------------------------------------------------------

#[test]
fn lex_double_quoted_string() {
    let tokens = tokenize(r#""hello world""#).expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "hello world");
}

#[test]
fn lex_single_quoted_string() {
    let tokens = tokenize("'hello world'").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "hello world");
}

#[test]
fn lex_all_escapes_decode() {
    let tokens = tokenize(r#""\n\t\r\\\"\'""#).expect("tokenize");
    assert_eq!(tokens[0].text, "\n\t\r\\\"'");
}

#[test]
fn lex_invalid_escape_fails() {
    let err = tokenize(r#""bad \x escape""#).expect_err("should fail");
    assert!(err
        .to_string()
        .contains("Invalid escape sequence \\x in \"-quoted string"));
}

#[test]
fn lex_escape_in_single_quoted_fails() {
    let err = tokenize(r"'a\n'").expect_err("should fail");
    assert!(err
        .to_string()
        .contains("Escapes not allowed in single-quoted strings"));
}

#[test]
fn lex_unterminated_string_at_eof() {
    let err = tokenize("host \"abc").expect_err("should fail");
    assert!(err
        .to_string()
        .contains("Unterminated string literal (end of input)"));
}

#[test]
fn lex_unterminated_string_at_newline() {
    let err = tokenize("host \"abc\ndef\"").expect_err("should fail");
    assert!(err
        .to_string()
        .contains("Unterminated string literal (unexpected newline)"));
}

#[test]
fn lex_trailing_backslash_fails() {
    let err = tokenize("\"abc\\").expect_err("should fail");
    assert!(err
        .to_string()
        .contains("Unterminated string literal (trailing backslash)"));
}

#[test]
fn lex_string_at_64k_limit_passes() {
    let input = format!("\"{}\"", "a".repeat(64 * 1024));
    let tokens = tokenize(&input).expect("tokenize");
    assert_eq!(tokens[0].text.len(), 64 * 1024);
}

#[test]
fn lex_string_over_64k_limit_fails() {
    let input = format!("\"{}\"", "a".repeat(64 * 1024 + 1));
    let err = tokenize(&input).expect_err("should fail");
    assert!(err.to_string().contains("String literal exceeds 64 KiB limit"));
}

// -----------------------------------------------------------
// Comments.
// -----------------------------------------------------------

#[test]
fn lex_hash_comment_to_end_of_line() {
    assert_eq!(
        kinds("listen 80; # listen 90;\nhost a;"),
        vec![
            TokenKind::Listen,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Host,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_double_slash_comment() {
    assert_eq!(
        kinds("listen 80; // comment\n"),
        vec![
            TokenKind::Listen,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn lex_block_comment_spans_lines() {
    assert_eq!(
        kinds("listen /* one\ntwo\nthree */ 80;"),
        vec![
            TokenKind::Listen,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn lex_block_comment_closing_at_end_of_input() {
    assert_eq!(kinds("listen 80; /* tail */"), kinds("listen 80;"));
}

#[test]
fn lex_block_comment_missing_final_slash_fails() {
    let err = tokenize("listen 80; /* tail *").expect_err("should fail");
    assert!(err.to_string().contains("Unterminated block comment"));
}

#[test]
fn lex_comment_tracks_line_numbers() {
    let tokens = tokenize("/* a\nb */ listen").expect("tokenize");
    assert_eq!(tokens[0].span.line, 2);
}

// -----------------------------------------------------------
// BOM, positions, errors.
// -----------------------------------------------------------

#[test]
fn lex_bom_does_not_shift_positions() {
    let plain = tokenize("server { listen 1; }").expect("tokenize");
    let bom = tokenize("\u{FEFF}server { listen 1; }").expect("tokenize");
    assert_eq!(plain.len(), bom.len());
    for (a, b) in plain.iter().zip(bom.iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.text, b.text);
        assert_eq!(a.span, b.span);
    }
}

#[test]
fn lex_unexpected_character() {
    let err = tokenize("listen @;").expect_err("should fail");
    assert_eq!(err.kind, ParseErrorKind::Tokenizer);
    assert!(err.to_string().contains("Unexpected character '@'"));
}

#[test]
fn lex_error_positions_are_one_based() {
    let err = tokenize("listen 80;\n\"oops").expect_err("should fail");
    assert_eq!(err.line, 2);
    assert!(err.to_string().starts_with("Line 2, column "));
}

#[test]
fn lex_error_context_is_offending_line() {
    let err = tokenize("listen 80;\nhost \"oops\nroot /;").expect_err("should fail");
    assert_eq!(err.context, "host \"oops");
}

#[test]
fn lex_column_points_at_token_start() {
    let tokens = tokenize("listen 8080;").expect("tokenize");
    assert_eq!(tokens[0].span.column, 1);
    assert_eq!(tokens[1].span.column, 8);
    assert_eq!(tokens[2].span.column, 12);
}

#[test]
fn lex_describe_format() {
    let tokens = tokenize("listen 8080;").expect("tokenize");
    assert_eq!(
        tokens[1].describe(),
        "[Token kind=\"NUMBER\" value=\"8080\" line=1 column=8]"
    );
}
