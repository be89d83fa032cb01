//! Error types for SpotLive.

use thiserror::Error;

/// Errors raised by the ambient layers (configuration, session file, IO).
#[derive(Error, Debug)]
pub enum SpotLiveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for ambient operations.
pub type SpotLiveResult<T> = Result<T, SpotLiveError>;

/// A failed call to the remote gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The auth service rejected the request; the message is shown verbatim.
    #[error("{0}")]
    Auth(String),

    /// The response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Local(#[from] SpotLiveError),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Local, pre-network input errors. No gateway call is made when one occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Outcome of a workflow that did not complete.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Creating or editing without an authenticated session.
    #[error("Please sign in to create events")]
    SignInRequired,

    /// The session does not own the record it tried to mutate.
    #[error("Only the owner of this event can change it")]
    NotOwner,

    /// The form or panel was dismissed before the request resolved.
    #[error("Operation cancelled")]
    Cancelled,
}

impl WorkflowError {
    /// Text shown to the user for a failure of the given kind of operation.
    ///
    /// Gateway failures collapse into the generic `fallback` notice; every
    /// other variant carries its own message.
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            WorkflowError::Gateway(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
