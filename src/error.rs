use reqwest::StatusCode;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The identity provider rejected the credentials, could not be reached,
    /// or answered without a token.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated operation was called before a successful login.
    #[error("not logged in")]
    NotAuthenticated,

    /// A vehicle list page came back with a non-success status.
    #[error("vehicle list request failed with status {status}")]
    List { status: StatusCode, body: String },

    /// The first vehicle list page reported a total that would take more
    /// pages than the client is willing to request.
    #[error("vehicle list reports {count} vehicles, too many to fetch in pages of {limit}")]
    ImplausibleCount { count: usize, limit: usize },

    /// The command endpoint returned a non-success status. The body is kept
    /// for diagnostics but is deliberately not part of the message.
    #[error("Command failed")]
    Command {
        command: String,
        status: StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }
}
