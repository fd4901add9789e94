//! Endpoint addresses.
//!
//! # Design
//! An `Address` is an immutable value that knows how to render itself into
//! the URL string handed to a transport. `Url` carries the scheme explicitly;
//! `HttpUrl` and `HttpsUrl` only fix the scheme and delegate everything else
//! to an inner `Url`.

use std::fmt;

/// A resolvable endpoint.
pub trait Address: Send + Sync {
    /// The host component as given at construction.
    fn host(&self) -> &str;

    /// The raw path component, not normalized.
    fn path(&self) -> &str;

    /// The full endpoint string passed to the transport.
    fn canonical(&self) -> String;
}

/// A URL with an arbitrary scheme (`http`, `https`, `ftp`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    scheme: String,
    host: String,
    path: String,
}

impl Url {
    pub fn new(host: &str, scheme: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

impl Address for Url {
    fn host(&self) -> &str {
        &self.host
    }

    fn path(&self) -> &str {
        &self.path
    }

    /// Renders `{scheme}://{host}/{path}`.
    ///
    /// A host that begins with the scheme is taken to be a fully-qualified
    /// URL and is returned verbatim; the path is ignored. The comparison is
    /// against the bare scheme, so `httpbin.org` with scheme `http` is also
    /// returned as is. At most one leading `/` is stripped from the path so
    /// that `"/a"` and `"a"` render identically.
    fn canonical(&self) -> String {
        if self.host.starts_with(&self.scheme) {
            return self.host.clone();
        }
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        format!("{}://{}/{path}", self.scheme, self.host)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A plain `http` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpUrl(Url);

impl HttpUrl {
    pub fn new(host: &str, path: &str) -> Self {
        Self(Url::new(host, "http", path))
    }
}

/// A `https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpsUrl(Url);

impl HttpsUrl {
    pub fn new(host: &str, path: &str) -> Self {
        Self(Url::new(host, "https", path))
    }
}

macro_rules! delegate_address {
    ($ty:ty) => {
        impl Address for $ty {
            fn host(&self) -> &str {
                self.0.host()
            }

            fn path(&self) -> &str {
                self.0.path()
            }

            fn canonical(&self) -> String {
                self.0.canonical()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

delegate_address!(HttpUrl);
delegate_address!(HttpsUrl);
