//! Username/password pairs for HTTP Basic authentication.
//!
//! `describe()` embeds the password literally. Callers that log it are
//! responsible for redaction; the `Debug` output never shows the password.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// A username/password pair consumed when an authenticated session is built.
pub trait Credentials: Send + Sync {
    fn username(&self) -> &str;

    fn password(&self) -> &str;

    /// Diagnostic representation, password included.
    fn describe(&self) -> String;
}

/// Plain authorization credentials.
#[derive(Clone)]
pub struct AuthCredentials {
    username: String,
    password: SecretString,
}

impl AuthCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

impl Credentials for AuthCredentials {
    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        self.password.expose_secret()
    }

    fn describe(&self) -> String {
        format!(
            "AuthCredentials(username='{}', password='{}')",
            self.username,
            self.password.expose_secret()
        )
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
