use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A parsed configuration: an ordered list of virtual hosts.
///
/// Server order is preserved from the source. Request routing selects
/// the first server matching a `(port, Host header)` pair, so order is
/// meaningful to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub servers: Vec<Server>,
}

/// One `server { … }` block: a virtual host and its route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// Listening port, in `[0, 65535]`.
    pub port: u16,
    /// Bind address.
    pub host: String,
    /// Names from `server_name`, lowercased; duplicates are kept.
    pub server_names: Vec<String>,
    /// HTTP status code → error page path. Last write wins.
    pub error_pages: BTreeMap<u16, String>,
    /// Request body cap in bytes.
    pub client_max_body_size: u64,
    /// Route blocks in source order.
    pub locations: Vec<Location>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            port: 80,
            host: "0.0.0.0".to_string(),
            server_names: Vec::new(),
            error_pages: BTreeMap::new(),
            client_max_body_size: 1_048_576, // 1 MiB
            locations: Vec::new(),
        }
    }
}

/// One `location <path> { … }` block: routing rules for a URI prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// URI prefix this block applies to.
    pub path: String,
    /// Allowed HTTP methods.
    pub methods: BTreeSet<Method>,
    /// Filesystem root requests are resolved against.
    pub root: String,
    /// Index file candidates in priority order.
    pub index_files: Vec<String>,
    pub autoindex: bool,
    /// Redirect target from `return`; empty when no redirect is set.
    pub redirect: String,
    /// Status code paired with `redirect`; 0 when no redirect is set.
    pub return_code: u16,
    /// Upload directory; empty when uploads are not configured.
    pub upload_store: String,
    /// Extensions routed to CGI, in source order.
    pub cgi_extensions: Vec<String>,
}

impl Location {
    /// Whether `method` is allowed for this route.
    #[must_use]
    pub fn allows_method(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Whether a `return` redirect is configured.
    #[must_use]
    pub fn has_redirect(&self) -> bool {
        !self.redirect.is_empty()
    }
}

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    /// Resolve an uppercase method name. Names are matched exactly;
    /// `get` is not a method.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "CONNECT" => Some(Self::Connect),
            "OPTIONS" => Some(Self::Options),
            "TRACE" => Some(Self::Trace),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
