//! Request authentication configuration

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Authentication configuration for an ad-hoc request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if authentication is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Resolves the `Authorization` header value, if any.
    ///
    /// A bearer config with an empty token, or a basic config missing the
    /// username or password, produces no header.
    #[must_use]
    pub fn authorization_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Bearer { token } => {
                if token.is_empty() {
                    None
                } else {
                    Some(format!("Bearer {token}"))
                }
            }
            Self::Basic { username, password } => {
                if username.is_empty() || password.is_empty() {
                    None
                } else {
                    let credentials = BASE64.encode(format!("{username}:{password}"));
                    Some(format!("Basic {credentials}"))
                }
            }
        }
    }
}
