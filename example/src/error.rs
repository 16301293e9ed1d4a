use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UserNotFound(u64),
    UnexpectedStatus(u16, String),
    DeserializationError(serde_json::Error),
    TransportError(fetch_stub::Error),
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DeserializationError(e)
    }
}

impl From<fetch_stub::Error> for Error {
    fn from(e: fetch_stub::Error) -> Self {
        Error::TransportError(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UserNotFound(id) => write!(f, "User {} not found", id),
            Error::UnexpectedStatus(code, text) => {
                write!(f, "Unexpected status {} {}", code, text)
            }
            Error::DeserializationError(e) => write!(f, "{}", e),
            Error::TransportError(e) => write!(f, "{}", e),
        }
    }
}
