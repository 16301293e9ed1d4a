use crate::{error::Error, util, RequestData, ResponseData};
use async_trait::async_trait;
use hyper::{body, Body, Request};
use hyper_tls::HttpsConnector;
use std::fmt::Debug;

/// The transport seam handed to code under test in place of a global fetch.
#[async_trait]
pub trait HttpClient: Debug {
    async fn fetch(&self, request: RequestData) -> Result<ResponseData, Error>;
}

/// Sends requests over the network with hyper.
#[derive(Debug)]
pub struct HyperHttpClient {}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn fetch(&self, request_data: RequestData) -> Result<ResponseData, Error> {
        let mut request_builder = Request::builder()
            .uri(request_data.uri.as_str())
            .method(request_data.method.as_str());

        if let Some(headers_mut) = request_builder.headers_mut() {
            util::put_headers(headers_mut, &request_data.headers)?;
        }

        let request: Request<Body> = request_builder.body(request_data.body.into())?;

        let client = hyper::Client::builder().build::<_, Body>(HttpsConnector::new());

        let response = client.request(request).await?;

        let status = response.status();
        let headers = util::extract_headers(response.headers());
        let body = body::to_bytes(response.into_body()).await?;

        Ok(ResponseData {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").into(),
            headers,
            body: Some(String::from_utf8_lossy(&body).into()),
        })
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
