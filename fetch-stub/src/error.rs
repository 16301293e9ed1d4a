use hyper::http;
use std::{fmt::Display, sync, time::Duration};

/// The failure value a simulated network error carries. It is shared so that
/// every invocation of the same responder hands back the very same value.
pub type NetworkFailure = sync::Arc<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum Error {
    Network(NetworkFailure),
    InvalidJson(String),
    InvalidHeaderName,
    InvalidHeaderValue,
    InvalidBody,
    PoisonedLock,
    AlreadyResponded,
    InterceptionRemoved,
    NotIntercepted,
    Timeout(Duration),
    HyperError(hyper::Error),
    HttpError(http::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Network(e) => write!(f, "Network error: {}", e),
            Error::InvalidJson(e) => write!(f, "The body couldn't be serialized as JSON: {}", e),
            Error::InvalidHeaderName => write!(f, "Invalid header name"),
            Error::InvalidHeaderValue => write!(f, "Invalid header value"),
            Error::InvalidBody => write!(f, "Invalid body"),
            Error::PoisonedLock => write!(f, "The lock was poisoned"),
            Error::AlreadyResponded => {
                write!(f, "A deferred responder was already supplied for this interception")
            }
            Error::InterceptionRemoved => {
                write!(f, "The interception was removed before a responder was supplied")
            }
            Error::NotIntercepted => {
                write!(f, "No interception is installed and pass-through is disabled")
            }
            Error::Timeout(duration) => write!(
                f,
                "No responder was supplied within {} ms",
                duration.as_millis()
            ),
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
        }
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
