//! Error types for the gridfeed library

use thiserror::Error;

/// Result type alias for gridfeed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Main error type for all feed operations
#[derive(Error, Debug)]
pub enum FeedError {
    /// The service rejected the auth token (HTTP 401)
    #[error("Invalid authorization key. {body}")]
    InvalidCredentials { body: String },

    /// Any other HTTP failure status (>= 400)
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The sheet is private and the request was unauthenticated.
    /// The service answers these with an HTML page and status 200.
    #[error("Sheet is private. Use authentication or make the sheet public. {body}")]
    PrivateSheet { body: String },

    /// A feed operation got an empty response body
    #[error("No response to {operation} call")]
    NoResponse { operation: &'static str },

    /// An entry is missing a typed link required for the operation
    #[error("Entry has no '{rel}' link")]
    MissingLink { rel: String },

    /// Client constructed without a spreadsheet key
    #[error("Spreadsheet key not provided")]
    MissingKey,

    /// Transport-level failure from the HTTP client
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed XML in a feed response
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error wrapper (service-account key files)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed service-account key file
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        FeedError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for FeedError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FeedError::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for FeedError {
    fn from(err: std::str::Utf8Error) -> Self {
        FeedError::Xml(err.to_string())
    }
}
