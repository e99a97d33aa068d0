use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Token kinds produced by the lexer.
///
/// Keywords are reserved words of the configuration language; they are
/// matched case-insensitively and carry their own kind so the parser can
/// recognize block openers without string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted word: directive name or argument, path, address.
    Identifier,
    /// Numeric literal, optionally carrying a single-letter unit suffix.
    Number,
    /// Quoted string literal; the lexeme holds the decoded content.
    String,
    /// Opening brace `{` — begins a block.
    LBrace,
    /// Closing brace `}` — ends a block.
    RBrace,
    /// `;` — terminates a directive.
    Semicolon,
    /// End of input; always the final token of a stream.
    Eof,
    /// `server` block keyword.
    Server,
    /// `location` block keyword.
    Location,
    /// `listen` directive.
    Listen,
    /// `host` directive.
    Host,
    /// `root` directive.
    Root,
    /// `index` directive.
    Index,
    /// `autoindex` directive.
    Autoindex,
    /// `methods` directive.
    Methods,
    /// `upload_store` directive.
    UploadStore,
    /// `return` directive.
    Return,
    /// `error_page` directive.
    ErrorPage,
    /// `client_max_body_size` directive.
    ClientMaxBodySize,
    /// `cgi_extension` directive.
    CgiExtension,
}

impl TokenKind {
    /// Uppercase name used in diagnostics and token dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "IDENTIFIER",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Semicolon => "SEMICOLON",
            Self::Eof => "END_OF_FILE",
            Self::Server => "KEYWORD_SERVER",
            Self::Location => "KEYWORD_LOCATION",
            Self::Listen => "KEYWORD_LISTEN",
            Self::Host => "KEYWORD_HOST",
            Self::Root => "KEYWORD_ROOT",
            Self::Index => "KEYWORD_INDEX",
            Self::Autoindex => "KEYWORD_AUTOINDEX",
            Self::Methods => "KEYWORD_METHODS",
            Self::UploadStore => "KEYWORD_UPLOAD_STORE",
            Self::Return => "KEYWORD_RETURN",
            Self::ErrorPage => "KEYWORD_ERROR_PAGE",
            Self::ClientMaxBodySize => "KEYWORD_CLIENT_MAX_BODY_SIZE",
            Self::CgiExtension => "KEYWORD_CGI_EXTENSION",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, lexeme, and source location.
///
/// The lexeme preserves the source text verbatim for identifiers and
/// numbers; for strings it holds the decoded content. `column` points at
/// the first character of the lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Byte offset of the lexeme in the original input. Best effort for
    /// strings, whose decoded length may differ from the source length.
    pub offset: usize,
}

impl Token {
    /// Render the token for diagnostics and test assertions.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "[Token kind=\"{}\" value=\"{}\" line={} column={}]",
            self.kind, self.text, self.span.line, self.span.column
        )
    }
}
