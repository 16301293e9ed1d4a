use crate::{
    data::user::{NewUser, User},
    error::Error,
};
use fetch_stub::{HttpClient, HyperHttpClient, RequestData, ResponseData};
use serde::de::DeserializeOwned;
use std::sync::Arc;

type SharedHttpClient = Arc<dyn HttpClient + Send + Sync>;

const DEFAULT_DOMAIN_NAME: &str = "https://users.example.org";

/// Builder used to build a UserDirectoryClient instance
#[derive(Debug, Clone, Default)]
pub struct UserDirectoryClientBuilder {
    domain_name: Option<String>,
    http_client: Option<SharedHttpClient>,
}

impl UserDirectoryClientBuilder {
    /// Create a new UserDirectoryClientBuilder instance.
    pub fn new() -> Self {
        Self {
            domain_name: None,
            http_client: None,
        }
    }

    /// Use the given domain_name when building a UserDirectoryClient instance.
    ///
    /// # Arguments
    /// `domain_name` - a domain name to use when calling the API.
    ///
    /// # Returns
    /// This builder.
    pub fn with_domain_name<T: Into<String>>(mut self, domain_name: T) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    /// Send requests through the given transport instead of the network.
    ///
    /// # Arguments
    /// `client` - any `HttpClient`, e.g. a stubbed one in tests.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: SharedHttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder and create a UserDirectoryClient instance using all of the previously configured values
    /// or their defaults.
    pub fn build(mut self) -> UserDirectoryClient {
        UserDirectoryClient {
            http: self
                .http_client
                .take()
                .unwrap_or_else(|| Arc::new(HyperHttpClient::new())),
            domain_name: self
                .domain_name
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_DOMAIN_NAME)),
        }
    }
}

/// A client for a small JSON user directory API.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    http: SharedHttpClient,
    domain_name: String,
}

impl UserDirectoryClient {
    pub fn new() -> Self {
        UserDirectoryClientBuilder::new().build()
    }

    /// Fetches a single user.
    ///
    /// # Returns
    /// The user, or `Error::UserNotFound` when the directory answers 404.
    pub async fn find_user(&self, id: u64) -> Result<User, Error> {
        let url = format!("{}/users?id={}", self.domain_name, id);
        let response = self.http.fetch(RequestData::get(url)).await?;

        if response.status_code == 404 {
            return Err(Error::UserNotFound(id));
        }

        Self::parse(response)
    }

    pub async fn search_users<T: AsRef<str>>(&self, display_name: T) -> Result<Vec<User>, Error> {
        let url = format!(
            "{}/users?name={}",
            self.domain_name,
            urlencoding::encode(display_name.as_ref())
        );
        let response = self.http.fetch(RequestData::get(url)).await?;

        Self::parse(response)
    }

    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, Error> {
        let request = RequestData::post(format!("{}/users", self.domain_name))
            .with_header("Content-type", "application/json")
            .with_body(serde_json::to_string(new_user)?);
        let response = self.http.fetch(request).await?;

        Self::parse(response)
    }

    fn parse<T: DeserializeOwned>(response: ResponseData) -> Result<T, Error> {
        if !response.is_ok() {
            return Err(Error::UnexpectedStatus(
                response.status_code,
                response.status_text,
            ));
        }

        Ok(serde_json::from_str(response.text())?)
    }
}

impl Default for UserDirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetch_stub::{
        get_request_param, json_ok, network_error, respond_with, server_error, FetchStub,
        FetchStubConfiguration,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn stub() -> FetchStub {
        let mut configuration = FetchStubConfiguration::new();
        configuration.set_passthrough(false);
        FetchStub::new(configuration)
    }

    fn client(stub: &FetchStub) -> UserDirectoryClient {
        UserDirectoryClientBuilder::new()
            .with_domain_name("https://directory.test")
            .with_http_client(Arc::new(stub.client()))
            .build()
    }

    fn ada() -> User {
        User {
            id: 7,
            display_name: String::from("Ada Lovelace"),
            email: Some(String::from("ada@example.org")),
        }
    }

    #[tokio::test]
    async fn finds_a_user_by_id() {
        let stub = stub();
        let interception = stub.on_get(|request| {
            match get_request_param(&request.uri, "id").as_deref() {
                Some("7") => Some(json_ok(&ada())),
                _ => Some(server_error(404, "Not Found")),
            }
        });

        assert_eq!(client(&stub).find_user(7).await.unwrap(), ada());
        assert!(matches!(
            client(&stub).find_user(8).await,
            Err(Error::UserNotFound(8))
        ));
        assert_eq!(
            interception.requests()[0].uri,
            "https://directory.test/users?id=7"
        );
    }

    #[tokio::test]
    async fn search_encodes_the_name() {
        let stub = stub();
        let interception = stub.on_get(|request| {
            let name = get_request_param(&request.uri, "name")?;
            Some(json_ok(&json!([{"id": 7, "displayName": name, "email": null}])))
        });

        let users = client(&stub).search_users("Ada Lovelace").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].display_name, "Ada Lovelace");
        assert_eq!(
            interception.requests()[0].uri,
            "https://directory.test/users?name=Ada%20Lovelace"
        );
    }

    #[tokio::test]
    async fn create_user_waits_for_the_server() {
        let stub = stub();
        let interception = stub.on_get(|_| None);
        let client = client(&stub);
        let new_user = NewUser {
            display_name: String::from("Ada Lovelace"),
            email: Some(String::from("ada@example.org")),
        };

        let created = tokio::spawn(async move { client.create_user(&new_user).await });
        while interception.call_count() == 0 {
            fetch_stub::wait().await;
        }

        let request = interception.requests().remove(0);
        assert_eq!(request.method, "POST");
        assert_eq!(request.headers["Content-type"], "application/json");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&request.body).unwrap(),
            json!({"displayName": "Ada Lovelace", "email": "ada@example.org"})
        );

        interception
            .respond(respond_with(
                201,
                vec![("Content-type", "application/json")],
                &ada(),
            ))
            .unwrap();

        assert_eq!(created.await.unwrap().unwrap(), ada());
    }

    #[tokio::test]
    async fn server_errors_surface_as_unexpected_status() {
        let stub = stub();
        let _interception = stub.on_request(|_| Some(server_error(503, "Service Unavailable")));

        match client(&stub).search_users("x").await {
            Err(Error::UnexpectedStatus(503, text)) => assert_eq!(text, "Service Unavailable"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn network_failures_surface_as_transport_errors() {
        let stub = stub();
        let _interception = stub.on_request(|_| Some(network_error("connection reset")));

        let error = client(&stub).find_user(1).await.unwrap_err();

        assert!(matches!(
            error,
            Error::TransportError(fetch_stub::Error::Network(_))
        ));
        assert_eq!(error.to_string(), "Network error: connection reset");
    }
}
