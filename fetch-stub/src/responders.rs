use crate::{
    error::{Error, NetworkFailure},
    RequestData, ResponseData,
};
use serde::Serialize;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

type RespondFn = dyn Fn(&RequestData) -> Result<ResponseData, Error> + Send + Sync;

/// Produces a response for an intercepted request.
#[derive(Clone)]
pub struct Responder {
    func: Arc<RespondFn>,
}

impl Responder {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&RequestData) -> Result<ResponseData, Error> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    pub fn respond(&self, request: &RequestData) -> Result<ResponseData, Error> {
        (self.func)(request)
    }
}

impl Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Responder")
    }
}

/// Every invocation of the returned responder fails with `Error::Network`
/// carrying `error`.
pub fn network_error<E: Into<Box<dyn std::error::Error + Send + Sync>>>(error: E) -> Responder {
    let failure: NetworkFailure = Arc::from(error.into());

    Responder::new(move |_| Err(Error::Network(failure.clone())))
}

/// A bodiless response with the given status and status text.
pub fn server_error<S: Into<String>>(status_code: u16, message: S) -> Responder {
    let status_text = message.into();

    Responder::new(move |_| {
        Ok(ResponseData {
            status_code,
            status_text: status_text.clone(),
            headers: HashMap::new(),
            body: None,
        })
    })
}

pub fn json_ok<T: Serialize + ?Sized>(body: &T) -> Responder {
    respond_with(200, vec![("Content-type", "application/json")], body)
}

/// A response with an arbitrary status and headers whose body is `body`
/// serialized as JSON.
pub fn respond_with<T, I, K, V>(status_code: u16, headers: I, body: &T) -> Responder
where
    T: Serialize + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let headers = headers
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect::<HashMap<String, String>>();
    // serialization problems are reported when the responder runs
    let body = serde_json::to_string(body).map_err(|e| e.to_string());

    Responder::new(move |_| {
        let body = body.clone().map_err(Error::InvalidJson)?;

        Ok(ResponseData {
            status_code,
            status_text: String::new(),
            headers: headers.clone(),
            body: Some(body),
        })
    })
}

pub fn ok<T, I, K, V>(headers: I, body: &T) -> Responder
where
    T: Serialize + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    respond_with(200, headers, body)
}

/// Reflects the request URL back as a JSON string.
pub fn echo_json() -> Responder {
    Responder::new(|request| json_ok(&request.uri).respond(request))
}
