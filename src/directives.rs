//! Directive application for server and location blocks.
//!
//! Each directive name maps to the validation it performs and the model
//! field it sets. Dispatch is a static match over the lowercased name;
//! the parser hands over the argument vector together with the position
//! and diagnostic context of the directive keyword.

use crate::config::{Location, Method, Server};
use crate::error::ParseError;

/// Position and diagnostic context for the directive being applied.
pub(crate) struct DirectiveContext {
    pub line: usize,
    pub column: usize,
    /// Token window rendered by the parser; attached to every error.
    pub window: String,
    /// Source line of the directive keyword; embedded in numeric error
    /// messages after `-->`.
    pub snippet: String,
}

impl DirectiveContext {
    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(message, self.line, self.column, self.window.clone())
    }
}

/// Apply a server-level directive.
///
/// `name` keeps its source spelling for the unknown-directive message;
/// dispatch itself is case-insensitive.
pub(crate) fn apply_server(
    server: &mut Server,
    name: &str,
    args: &[String],
    ctx: &DirectiveContext,
) -> Result<(), ParseError> {
    match name.to_ascii_lowercase().as_str() {
        "listen" => {
            require_exact(args, 1, "listen", ctx)?;
            server.port = parse_port(&args[0], ctx)?;
            Ok(())
        }
        "host" => {
            require_exact(args, 1, "host", ctx)?;
            server.host = args[0].clone();
            Ok(())
        }
        "server_name" => {
            require_min(args, 1, "server_name", ctx)?;
            for arg in args {
                server.server_names.push(arg.to_ascii_lowercase());
            }
            Ok(())
        }
        "client_max_body_size" => {
            require_exact(args, 1, "client_max_body_size", ctx)?;
            server.client_max_body_size = parse_byte_size(&args[0], "client_max_body_size", ctx)?;
            Ok(())
        }
        "error_page" => {
            require_min(args, 2, "error_page", ctx)?;
            let path = &args[args.len() - 1];
            for arg in &args[..args.len() - 1] {
                let code = parse_status_code(arg, "error_page", ctx)?;
                server.error_pages.insert(code, path.clone());
            }
            Ok(())
        }
        _ => Err(ctx.syntax(format!("Unknown directive: '{name}'"))),
    }
}

/// Apply a location-level directive.
pub(crate) fn apply_location(
    location: &mut Location,
    name: &str,
    args: &[String],
    ctx: &DirectiveContext,
) -> Result<(), ParseError> {
    match name.to_ascii_lowercase().as_str() {
        "root" => {
            require_exact(args, 1, "root", ctx)?;
            location.root = args[0].clone();
            Ok(())
        }
        "index" => {
            require_min(args, 1, "index", ctx)?;
            append_split(&mut location.index_files, args);
            Ok(())
        }
        "autoindex" => {
            require_exact(args, 1, "autoindex", ctx)?;
            location.autoindex = match args[0].as_str() {
                "on" => true,
                "off" => false,
                other => {
                    return Err(ctx.syntax(format!("Invalid value for 'autoindex': {other}")));
                }
            };
            Ok(())
        }
        "methods" => {
            require_min(args, 1, "methods", ctx)?;
            for arg in args {
                let method = Method::from_name(arg)
                    .ok_or_else(|| ctx.syntax(format!("Invalid HTTP method: {arg}")))?;
                location.methods.insert(method);
            }
            Ok(())
        }
        "upload_store" => {
            require_exact(args, 1, "upload_store", ctx)?;
            location.upload_store = args[0].clone();
            Ok(())
        }
        "cgi_extension" => {
            require_min(args, 1, "cgi_extension", ctx)?;
            append_split(&mut location.cgi_extensions, args);
            Ok(())
        }
        "return" => {
            require_exact(args, 2, "return", ctx)?;
            let code = parse_status_code(&args[0], "return", ctx)?;
            location.redirect = args[1].clone();
            location.return_code = code;
            Ok(())
        }
        _ => Err(ctx.syntax(format!("Unknown directive: '{name}'"))),
    }
}

/// Split comma-joined arguments and append the non-empty pieces in
/// order. `index a.html,b.html` and `index a.html b.html` are
/// equivalent.
fn append_split(target: &mut Vec<String>, args: &[String]) {
    for raw in args {
        for piece in raw.split(',') {
            if !piece.is_empty() {
                target.push(piece.to_string());
            }
        }
    }
}

fn require_exact(
    args: &[String],
    expected: usize,
    directive: &str,
    ctx: &DirectiveContext,
) -> Result<(), ParseError> {
    if args.len() != expected {
        return Err(ctx.syntax(format!(
            "Directive '{directive}' takes exactly {expected} argument(s), but got {}",
            args.len()
        )));
    }
    Ok(())
}

fn require_min(
    args: &[String],
    min: usize,
    directive: &str,
    ctx: &DirectiveContext,
) -> Result<(), ParseError> {
    if args.len() < min {
        return Err(ctx.syntax(format!(
            "Directive '{directive}' requires at least {min} argument(s), but got {}",
            args.len()
        )));
    }
    Ok(())
}

enum NumberError {
    Invalid,
    Overflow,
}

/// Full-string decimal parse, non-negative. A sign or any trailing
/// non-digit byte is invalid.
fn parse_number(value: &str) -> Result<u64, NumberError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumberError::Invalid);
    }
    value.parse::<u64>().map_err(|_| NumberError::Overflow)
}

fn parse_port(value: &str, ctx: &DirectiveContext) -> Result<u16, ParseError> {
    let port = match parse_number(value) {
        Ok(n) => n,
        Err(NumberError::Invalid) => {
            return Err(ctx.syntax(format!("Invalid port number: {value}")));
        }
        Err(NumberError::Overflow) => {
            return Err(ctx.syntax(format!("Port number out of integer range: {value}")));
        }
    };
    u16::try_from(port)
        .map_err(|_| ctx.syntax(format!("Port number out of valid range (0-65535): {value}")))
}

/// Decimal status code for `error_page` and `return`.
fn parse_status_code(value: &str, field: &str, ctx: &DirectiveContext) -> Result<u16, ParseError> {
    match parse_number(value) {
        Ok(n) => u16::try_from(n).map_err(|_| range_error(field, value, ctx)),
        Err(NumberError::Invalid) => Err(invalid_number(field, value, ctx)),
        Err(NumberError::Overflow) => Err(range_error(field, value, ctx)),
    }
}

fn invalid_number(field: &str, value: &str, ctx: &DirectiveContext) -> ParseError {
    ctx.syntax(format!(
        "Invalid number for '{field}': {value}\n  --> {}",
        ctx.snippet
    ))
}

fn range_error(field: &str, value: &str, ctx: &DirectiveContext) -> ParseError {
    ctx.syntax(format!(
        "Number out of range for '{field}': {value}\n  --> {}",
        ctx.snippet
    ))
}

/// Byte size with an optional `k`/`m`/`g` multiplier (either case). No
/// suffix means bytes.
fn parse_byte_size(value: &str, field: &str, ctx: &DirectiveContext) -> Result<u64, ParseError> {
    let invalid = || {
        ctx.syntax(format!(
            "Invalid size format for '{field}': {value}\n  --> {}",
            ctx.snippet
        ))
    };

    let (digits, multiplier): (&str, u64) = match value.bytes().last() {
        Some(b'k' | b'K') => (&value[..value.len() - 1], 1024),
        Some(b'm' | b'M') => (&value[..value.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&value[..value.len() - 1], 1024 * 1024 * 1024),
        _ => (value, 1),
    };

    let number = parse_number(digits).map_err(|_| invalid())?;
    number.checked_mul(multiplier).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DirectiveContext {
        DirectiveContext {
            line: 1,
            column: 1,
            window: String::new(),
            snippet: "client_max_body_size 10m;".to_string(),
        }
    }

    #[test]
    fn byte_size_units() {
        let ctx = ctx();
        assert_eq!(parse_byte_size("10", "f", &ctx).unwrap(), 10);
        assert_eq!(parse_byte_size("10k", "f", &ctx).unwrap(), 10 * 1024);
        assert_eq!(parse_byte_size("10M", "f", &ctx).unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_byte_size("1g", "f", &ctx).unwrap(), 1 << 30);
    }

    #[test]
    fn byte_size_rejects_garbage() {
        let ctx = ctx();
        for bad in ["", "k", "10x", "1.5m", "m10"] {
            let err = parse_byte_size(bad, "f", &ctx).unwrap_err();
            assert!(err.message.contains("Invalid size format for 'f'"), "{bad}");
        }
    }

    #[test]
    fn byte_size_overflow_is_rejected() {
        let ctx = ctx();
        let err = parse_byte_size("18446744073709551615g", "f", &ctx).unwrap_err();
        assert!(err.message.contains("Invalid size format"));
    }

    #[test]
    fn numeric_message_carries_snippet() {
        let ctx = ctx();
        let err = parse_status_code("abc", "error_page", &ctx).unwrap_err();
        assert!(err.message.contains("Invalid number for 'error_page': abc"));
        assert!(err.message.contains("\n  --> client_max_body_size 10m;"));
    }

    #[test]
    fn comma_split_drops_empty_pieces() {
        let mut out = Vec::new();
        append_split(&mut out, &[",a.html,,b.html,".to_string()]);
        assert_eq!(out, vec!["a.html", "b.html"]);
    }
}
