use std::collections::HashSet;

use crate::config::{Config, Location, Server};
use crate::directives::{self, DirectiveContext};
use crate::error::ParseError;
use crate::lexer::extract_line;
use crate::token::{Span, Token, TokenKind};

/// Tokens shown on each side of the current position in a diagnostic
/// context window.
const CONTEXT_RANGE: usize = 2;

/// Directives allowed to repeat within a server block.
const REPEATABLE_SERVER_DIRECTIVES: &[&str] = &["error_page"];
/// Directives allowed to repeat within a location block.
const REPEATABLE_LOCATION_DIRECTIVES: &[&str] = &["methods"];

/// Parse a token stream into a [`Config`].
///
/// `source` is the text the tokens were produced from; it is consulted
/// only to render source-line snippets in diagnostics.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first structural or semantic error.
/// Parsing is all-or-nothing; no partial `Config` is produced.
pub fn parse(tokens: &[Token], source: &str) -> Result<Config, ParseError> {
    Parser::new(tokens, source).parse_config()
}

/// Recursive-descent parser over a token stream.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: Span { line: 0, column: 0 },
                offset: 0,
            },
        }
    }

    /// Parse the whole stream: one or more server blocks and nothing
    /// else at the top level.
    pub fn parse_config(&mut self) -> Result<Config, ParseError> {
        let mut config = Config::default();

        if self.at_end() {
            return Err(ParseError::syntax(
                "Empty configuration",
                1,
                1,
                self.context_window(),
            ));
        }

        while !self.at_end() {
            if self.current().kind != TokenKind::Server {
                return Err(self.syntax_error("Expected 'server' block"));
            }
            let server = self.parse_server()?;
            config.servers.push(server);

            // Only another server block or the end of input may follow.
            if !self.at_end() && self.current().kind != TokenKind::Server {
                return Err(self.syntax_error("Unexpected token after server block"));
            }
        }

        Ok(config)
    }

    fn parse_server(&mut self) -> Result<Server, ParseError> {
        self.expect(TokenKind::Server, "server block")?;
        self.expect(TokenKind::LBrace, "start of server block")?;

        let mut server = Server::default();
        let mut seen = HashSet::new();

        while !self.at_end() && self.current().kind != TokenKind::RBrace {
            if self.current().kind == TokenKind::Location {
                let location = self.parse_location()?;
                server.locations.push(location);
            } else {
                self.check_duplicate(&mut seen, REPEATABLE_SERVER_DIRECTIVES)?;
                self.parse_server_directive(&mut server)?;
            }
        }

        self.expect(TokenKind::RBrace, "end of server block")?;
        Ok(server)
    }

    fn parse_server_directive(&mut self, server: &mut Server) -> Result<(), ParseError> {
        let key = self.current().clone();
        self.advance();
        let args = self.collect_args();
        self.expect(TokenKind::Semicolon, "semicolon after server directive")?;
        let ctx = self.directive_context(&key);
        directives::apply_server(server, &key.text, &args, &ctx)
    }

    fn parse_location(&mut self) -> Result<Location, ParseError> {
        self.expect(TokenKind::Location, "location block")?;
        let path =
            self.expect_one_of(&[TokenKind::String, TokenKind::Identifier], "location path")?;
        self.expect(TokenKind::LBrace, "start of location block")?;

        let mut location = Location {
            path: path.text,
            ..Location::default()
        };
        let mut seen = HashSet::new();

        while !self.at_end() && self.current().kind != TokenKind::RBrace {
            self.check_duplicate(&mut seen, REPEATABLE_LOCATION_DIRECTIVES)?;
            self.parse_location_directive(&mut location)?;
        }

        self.expect(TokenKind::RBrace, "end of location block")?;
        Ok(location)
    }

    fn parse_location_directive(&mut self, location: &mut Location) -> Result<(), ParseError> {
        let key = self.current().clone();
        self.advance();
        let args = self.collect_args();
        self.expect(TokenKind::Semicolon, "semicolon after location directive")?;
        let ctx = self.directive_context(&key);
        directives::apply_location(location, &key.text, &args, &ctx)
    }

    /// Duplicate policy: each directive may appear once per block unless
    /// it is in the block's repeatable set.
    fn check_duplicate(
        &self,
        seen: &mut HashSet<String>,
        repeatable: &[&str],
    ) -> Result<(), ParseError> {
        let name = self.current().text.to_ascii_lowercase();
        if repeatable.contains(&name.as_str()) || seen.insert(name.clone()) {
            return Ok(());
        }
        Err(self.syntax_error(format!("Duplicate directive: '{name}'")))
    }

    fn directive_context(&self, key: &Token) -> DirectiveContext {
        DirectiveContext {
            line: key.span.line,
            column: key.span.column,
            window: self.context_window(),
            snippet: extract_line(self.source, key.offset),
        }
    }

    // --- Token navigation ---

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Token `n` positions ahead, or the final token on overflow.
    #[must_use]
    pub fn peek(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
            .unwrap_or(&self.eof)
    }

    /// Token `n` positions back, or an `Eof` sentinel on underflow.
    #[must_use]
    pub fn look_behind(&self, n: usize) -> &Token {
        self.pos
            .checked_sub(n)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    /// Collect directive arguments: strings, numbers, and identifiers
    /// up to the first token of any other kind.
    fn collect_args(&mut self) -> Vec<String> {
        let mut values = Vec::new();
        while matches!(
            self.current().kind,
            TokenKind::String | TokenKind::Number | TokenKind::Identifier
        ) {
            values.push(self.current().text.clone());
            self.advance();
        }
        values
    }

    fn expect(&mut self, expected: TokenKind, context: &str) -> Result<(), ParseError> {
        let actual = self.current();
        if actual.kind != expected {
            return Err(ParseError::unexpected_token(
                format!(
                    "Expected {}, but got {} for {}",
                    expected.name(),
                    actual.kind.name(),
                    context
                ),
                actual.span.line,
                actual.span.column,
                self.context_window(),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    /// Consume and return the current token if its kind is one of
    /// `kinds`.
    fn expect_one_of(&mut self, kinds: &[TokenKind], context: &str) -> Result<Token, ParseError> {
        let actual = self.current().clone();
        if kinds.contains(&actual.kind) {
            self.pos += 1;
            return Ok(actual);
        }

        let mut expected = String::new();
        for (i, kind) in kinds.iter().enumerate() {
            if i > 0 {
                expected.push_str(" or ");
            }
            expected.push_str(kind.name());
        }
        Err(ParseError::unexpected_token(
            format!(
                "Expected {expected} for {context}, but got {}",
                actual.kind.name()
            ),
            actual.span.line,
            actual.span.column,
            self.context_window(),
        ))
    }

    // --- Diagnostics ---

    /// Render the tokens surrounding the current position, the current
    /// one marked with `>> `.
    fn context_window(&self) -> String {
        let start = self.pos.saturating_sub(CONTEXT_RANGE);
        let end = (self.pos + CONTEXT_RANGE + 1).min(self.tokens.len());
        let mut out = String::new();
        for i in start..end {
            out.push_str(if i == self.pos { ">> " } else { "   " });
            out.push_str(&self.tokens[i].describe());
            out.push('\n');
        }
        out
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        let span = self.current().span;
        ParseError::syntax(message, span.line, span.column, self.context_window())
    }
}
