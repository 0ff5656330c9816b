//! Backend address abstraction.

use url::Url;

/// Address of the locally managed backend server.
///
/// Created once at startup and shared read-only by every job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoint {
    /// Host the backend is bound to.
    pub host: String,
    /// Port the backend is bound to.
    pub port: u16,
    /// Pre-calculated base URL (`http://host:port/`).
    pub base_url: Url,
}

impl BackendEndpoint {
    /// Create an endpoint for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, url::ParseError> {
        let host = host.into();
        let base_url = Url::parse(&format!("http://{}:{}", bracket_ipv6(&host), port))?;
        Ok(Self { host, port, base_url })
    }

    /// `scheme://host:port` without a trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Build the absolute URL for a backend path.
    ///
    /// The path is appended verbatim (never resolved relative to the base), so a
    /// path like `//other-host/x` stays on this backend.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        if path.starts_with('/') {
            Url::parse(&format!("{}{}", self.origin(), path))
        } else {
            Url::parse(&format!("{}/{}", self.origin(), path))
        }
    }
}

impl std::fmt::Display for BackendEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", bracket_ipv6(&self.host), self.port)
    }
}

fn bracket_ipv6(host: &str) -> std::borrow::Cow<'_, str> {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host).into()
    } else {
        host.into()
    }
}
