use crate::error::Error;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// An outbound request as seen by the interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestData {
    pub uri: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RequestData {
    pub fn new<M: Into<String>, U: Into<String>>(method: M, uri: U) -> Self {
        Self {
            uri: uri.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn get<U: Into<String>>(uri: U) -> Self {
        Self::new("GET", uri)
    }

    pub fn post<U: Into<String>>(uri: U) -> Self {
        Self::new("POST", uri)
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = body.into();
        self
    }
}

/// A canned response. `body` is `None` when the response carries no body at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    pub status_code: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl ResponseData {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Looks a header up ignoring the case of its name.
    pub fn header<S: AsRef<str>>(&self, name: S) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.as_ref()))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let body = self.body.as_deref().ok_or(Error::InvalidBody)?;
        Ok(serde_json::from_str(body)?)
    }
}
