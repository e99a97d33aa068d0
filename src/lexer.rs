use crate::error::ParseError;
use crate::token::{Span, Token, TokenKind};

/// Maximum decoded length of a string literal.
const MAX_STRING_LEN: usize = 64 * 1024;

/// Tokenize a configuration source string into a token vector.
///
/// The returned vector is always terminated by a single `Eof` token so
/// consumers may probe `kind == Eof` without bounds checks. A UTF-8 BOM
/// at the start of the input is skipped and appears in no token.
///
/// # Errors
///
/// Returns a [`ParseError`] of kind `Tokenizer` on malformed input:
/// unterminated strings or block comments, invalid escapes, oversized
/// literals, bad number suffixes, or characters that cannot start a
/// token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).tokenize()
}

/// Extract the full source line containing the byte `offset`.
///
/// Scans backward to the previous newline (or start of input) and
/// forward to the next newline (or end of input).
pub(crate) fn extract_line(source: &str, offset: usize) -> String {
    let bytes = source.as_bytes();
    let offset = offset.min(bytes.len());
    let start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| offset + i);
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}

const fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || matches!(c, b'_' | b'/' | b'.' | b'-' | b':')
}

const fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'/' | b'.' | b'-' | b':')
}

/// Resolve a scanned word against the reserved keywords.
///
/// Matching is case-insensitive; the token lexeme keeps the original
/// spelling.
fn resolve_keyword(word: &str) -> TokenKind {
    match word.to_ascii_lowercase().as_str() {
        "server" => TokenKind::Server,
        "location" => TokenKind::Location,
        "listen" => TokenKind::Listen,
        "host" => TokenKind::Host,
        "root" => TokenKind::Root,
        "index" => TokenKind::Index,
        "autoindex" => TokenKind::Autoindex,
        "methods" => TokenKind::Methods,
        "upload_store" => TokenKind::UploadStore,
        "return" => TokenKind::Return,
        "error_page" => TokenKind::ErrorPage,
        "client_max_body_size" => TokenKind::ClientMaxBodySize,
        "cgi_extension" => TokenKind::CgiExtension,
        _ => TokenKind::Identifier,
    }
}

struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let input = source.as_bytes();
        // The BOM is not part of any token and does not advance the
        // line/column accounting.
        let start = if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            source,
            input,
            pos: start,
            line: 1,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::with_capacity(self.input.len() / 4);

        loop {
            self.skip_blank()?;
            let Some(c) = self.peek() else { break };
            tokens.push(self.next_token(c)?);
        }

        tokens.push(self.make_token(TokenKind::Eof, String::new()));
        Ok(tokens)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> u8 {
        let c = self.input[self.pos];
        if c == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        c
    }

    /// Skip whitespace and all three comment forms between tokens.
    fn skip_blank(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.col = 1;
                }
                b' ' | b'\t' => {
                    self.pos += 1;
                    self.col += 1;
                }
                b'#' => self.skip_line_comment(1),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(2),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self, marker_len: usize) {
        self.pos += marker_len;
        self.col += marker_len;
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            self.pos += 1;
            self.col += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        self.pos += 2;
        self.col += 2;
        while !self.at_end() {
            if self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                self.col += 2;
                return Ok(());
            }
            if self.peek() == Some(b'\n') {
                self.pos += 1;
                self.line += 1;
                self.col = 1;
            } else {
                self.pos += 1;
                self.col += 1;
            }
        }
        Err(self.error("Unterminated block comment"))
    }

    fn next_token(&mut self, c: u8) -> Result<Token, ParseError> {
        if c.is_ascii_digit() {
            // An IPv4-looking prefix (two or more dots) or a digit
            // followed directly by an identifier character
            // ("1index.html") reads as an identifier, not a number.
            let next = self.peek_at(1);
            if self.looks_like_ip_address()
                || next.is_some_and(|n| !n.is_ascii_digit() && is_identifier_char(n))
            {
                return self.lex_identifier();
            }
            return self.lex_number();
        }
        if is_identifier_start(c) {
            return self.lex_identifier();
        }
        if c == b'"' || c == b'\'' {
            return self.lex_string();
        }
        match c {
            b'{' => {
                self.advance();
                Ok(self.make_token(TokenKind::LBrace, "{".to_string()))
            }
            b'}' => {
                self.advance();
                Ok(self.make_token(TokenKind::RBrace, "}".to_string()))
            }
            b';' => {
                self.advance();
                Ok(self.make_token(TokenKind::Semicolon, ";".to_string()))
            }
            _ => Err(self.error(format!("Unexpected character '{}'", char::from(c)))),
        }
    }

    /// Lightweight IPv4 heuristic: a run of digits and dots with at
    /// least two dots, e.g. `127.0.0.1`. Not full address validation.
    fn looks_like_ip_address(&self) -> bool {
        let mut i = self.pos;
        let mut dots = 0;
        while let Some(&b) = self.input.get(i) {
            if b.is_ascii_digit() {
                i += 1;
            } else if b == b'.' {
                dots += 1;
                i += 1;
            } else {
                break;
            }
        }
        dots >= 2
    }

    fn lex_identifier(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }
        self.validate_identifier(&self.input[start..self.pos])?;
        let text = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok(self.make_token(resolve_keyword(&text), text))
    }

    fn validate_identifier(&self, word: &[u8]) -> Result<(), ParseError> {
        if word.is_empty() {
            return Err(self.error("Zero-length identifier"));
        }
        if word.contains(&b'$') {
            return Err(self.error(
                "Found '$' in unquoted token; please wrap any text containing '$' in quotes",
            ));
        }
        if word.iter().any(|&c| c < 0x20 || c == 0x7F) {
            return Err(self.error("Identifier contains non-printable/control character"));
        }
        Ok(())
    }

    /// Digits plus an optional single-letter unit suffix. The suffix is
    /// kept verbatim in the lexeme; decoding happens at the directive
    /// level where the unit's meaning is known.
    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
            if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                return Err(self.error(
                    "Invalid number suffix: expected single letter like 'k', 'm', or 'g'",
                ));
            }
        }
        let text = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok(self.make_token(TokenKind::Number, text))
    }

    fn lex_string(&mut self) -> Result<Token, ParseError> {
        let quote = self.advance();
        let mut content: Vec<u8> = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.unterminated_string("end of input")),
                Some(b'\n') => return Err(self.unterminated_string("unexpected newline")),
                Some(_) => {}
            }
            let c = self.advance();

            if c == quote {
                let text = String::from_utf8_lossy(&content).into_owned();
                return Ok(self.make_token(TokenKind::String, text));
            }

            if c == b'\\' {
                if quote == b'\'' {
                    return Err(self.error("Escapes not allowed in single-quoted strings"));
                }
                content.push(self.lex_escape(quote)?);
            } else {
                content.push(c);
            }

            if content.len() > MAX_STRING_LEN {
                return Err(self.error("String literal exceeds 64 KiB limit"));
            }
        }
    }

    fn lex_escape(&mut self, quote: u8) -> Result<u8, ParseError> {
        if self.at_end() {
            return Err(self.unterminated_string("trailing backslash"));
        }
        let next = self.advance();
        match next {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'\'' => Ok(b'\''),
            other => Err(self.error(format!(
                "Invalid escape sequence \\{} in {}-quoted string",
                char::from(other),
                char::from(quote)
            ))),
        }
    }

    fn unterminated_string(&self, reason: &str) -> ParseError {
        self.error(format!("Unterminated string literal ({reason})"))
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::tokenizer(
            message,
            self.line,
            self.col,
            extract_line(self.source, self.pos),
        )
    }

    /// Build a token ending at the current cursor. The starting column
    /// is back-computed from the lexeme length and clamped to 1; for
    /// strings the decoded length makes column and offset best-effort.
    fn make_token(&self, kind: TokenKind, text: String) -> Token {
        let column = self.col.saturating_sub(text.len()).max(1);
        let offset = self.pos.saturating_sub(text.len());
        Token {
            kind,
            text,
            span: Span {
                line: self.line,
                column,
            },
            offset,
        }
    }
}
