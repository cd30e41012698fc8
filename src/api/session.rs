use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// A bearer token obtained from a successful login.
#[derive(Clone)]
pub struct BearerToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(value: String) -> Self {
        Self {
            value,
            issued_at: Utc::now(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// The login state of a client. Replaced wholesale by each login; there is
/// no expiry tracking or renewal.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<BearerToken>,
}

impl Session {
    pub fn authenticated(token: BearerToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The token to present on a request, or [`Error::NotAuthenticated`].
    pub(crate) fn require(&self) -> Result<&str> {
        self.token
            .as_ref()
            .map(BearerToken::as_str)
            .ok_or(Error::NotAuthenticated)
    }
}
