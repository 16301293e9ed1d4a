mod configuration;
mod data;
mod error;
mod http_client;
mod interceptor;
mod query;
mod responders;
mod test_session;
mod util;

pub use configuration::FetchStubConfiguration;
pub use data::{RequestData, ResponseData};
pub use error::{Error, NetworkFailure};
pub use fetch_stub_codegen::fetch_stub_test;
pub use http_client::{HttpClient, HyperHttpClient};
pub use interceptor::{FetchStub, Interception, StubbedClient};
pub use query::get_request_param;
pub use responders::{
    echo_json, json_ok, network_error, ok, respond_with, server_error, Responder,
};
pub use test_session::{global, TestSession};
pub use util::wait;
