use http::StatusCode;
use std::fmt;
use std::io;
use thiserror::Error;

/// The error type handlers return across the adapter boundary.
///
/// Anything implementing [`std::error::Error`] can cross it; the adapter
/// only looks for a [`StatusError`] inside.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error carrying an explicit HTTP status code alongside its cause.
///
/// Returning a `StatusError` from a handler makes the adapter respond with
/// the given status instead of the default 500. The status code is consumed
/// structurally and never appears in the error message: displaying a
/// `StatusError` displays its cause.
#[derive(Debug)]
pub struct StatusError {
    status: StatusCode,
    source: BoxError,
}

impl StatusError {
    /// Creates a new `StatusError` from a status code and an underlying cause.
    pub fn new(status: StatusCode, source: impl Into<BoxError>) -> Self {
        Self { status, source: source.into() }
    }

    /// Creates a new `StatusError` with a plain message as its cause.
    pub fn msg(status: StatusCode, message: impl ToString) -> Self {
        Self { status, source: message.to_string().into() }
    }

    /// Returns the status code the adapter should respond with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl std::error::Error for StatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Errors raised while reading a request body.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("body has been consumed")]
    BodyConsumed,
}

/// Errors raised while writing a response.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
