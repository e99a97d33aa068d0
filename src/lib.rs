//! Configuration front-end for a webserv-style HTTP server.
//!
//! An nginx-like configuration language: `server` blocks holding
//! semicolon-terminated directives and nested `location` blocks. The
//! crate tokenizes a fully buffered source string, parses it by
//! recursive descent, and produces a typed, validated [`Config`] of
//! virtual hosts. Diagnostics carry the 1-based source position and a
//! context window of surrounding tokens or source text.
//!
//! # Quick start
//!
//! ```
//! use webconf_rs::{parse_str, Method};
//!
//! let config = parse_str(
//!     "server {\n\
//!      \tlisten 8080;\n\
//!      \thost 127.0.0.1;\n\
//!      \tlocation / {\n\
//!      \t\tmethods GET POST;\n\
//!      \t\troot /var/www;\n\
//!      \t}\n\
//!      }\n",
//! )
//! .unwrap();
//!
//! let server = &config.servers[0];
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.host, "127.0.0.1");
//! assert!(server.locations[0].allows_method(Method::Get));
//! ```
//!
//! ## Inspect a failure
//!
//! ```
//! let err = webconf_rs::parse_str("server { listen 8080; listen 80; }").unwrap_err();
//! assert!(err.to_string().contains("Duplicate directive: 'listen'"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
mod directives;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use config::{Config, Location, Method, Server};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::tokenize;
pub use parser::{parse, Parser};
pub use token::{Span, Token, TokenKind};

/// Tokenize and parse a configuration source string in one step.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered. Parsing is
/// all-or-nothing; no partial [`Config`] is produced.
pub fn parse_str(input: &str) -> Result<Config, ParseError> {
    let tokens = tokenize(input)?;
    parse(&tokens, input)
}
