//! Error types for the arXiv notifier.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Source failures never escape the fetch orchestrator; command failures are
//! rendered back to the chat with [`CommandError::to_user_message`].

use std::time::Duration;

/// Errors from the HTTP client layer (arXiv API, chat webhook).
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the remote service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from the service
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Atom feed could not be parsed
    #[error("Failed to parse feed: {0}")]
    Feed(String),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Faults raised while obtaining papers for a cycle.
///
/// An absent digest is not a fault: sources report it as `Ok(None)`.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// Error from the arXiv API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Mail store could not be read
    #[error("Mail store error: {0}")]
    Io(#[from] std::io::Error),

    /// Source did not answer within the bounded wait
    #[error("Source timed out after {0:?}")]
    Timeout(Duration),

    /// A message could not be interpreted (bad headers, missing date)
    #[error("Malformed message: {0}")]
    Malformed(String),

    /// MIME structure or body encoding could not be decoded
    #[error("Mail decoding error: {0}")]
    Mail(#[from] mailparse::MailParseError),
}

/// Failures of the persisted interest store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Reading or writing the file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the interest file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a valid interest set
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }
}

/// Failures delivering a message to the chat channel.
#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    /// Webhook request failed
    #[error("Webhook error: {0}")]
    Client(#[from] ClientError),

    /// Writing to the local output failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from chat command handling.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    /// Category name outside the fixed set
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Paper index outside today's result set
    #[error("No paper number {index} (today has {available})")]
    PaperOutOfRange {
        /// Requested 1-based index
        index: usize,
        /// Number of interesting papers available
        available: usize,
    },

    /// Argument present but not usable
    #[error("Invalid argument '{value}' for {argument}")]
    InvalidArgument {
        /// Argument name
        argument: &'static str,
        /// Offending value
        value: String,
    },

    /// Required argument absent
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Command name not recognized
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Interest store could not be written; the change was not applied
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl CommandError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid(argument: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument { argument, value: value.into() }
    }

    /// Convert to a user-friendly message for the chat channel.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::UnknownCategory(cat) => {
                format!("Parameter cannot be {cat} (use authors, keywords or categories)")
            }
            Self::PaperOutOfRange { index, available: 0 } => {
                format!("There is no paper {index}: no interesting papers today")
            }
            Self::PaperOutOfRange { index, available } => {
                format!("There is no paper {index}, choose between 1 and {available}")
            }
            Self::UnknownCommand(name) => {
                format!("Unknown command '{name}', try !help")
            }
            Self::Persistence(err) => {
                format!("Could not save queries, nothing was changed ({err})")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for command handling.
pub type CommandResult<T> = Result<T, CommandError>;

/// Result type for channel delivery.
pub type ChannelResult<T> = Result<T, ChannelError>;
