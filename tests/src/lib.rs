#[cfg(test)]
mod tests {
    use fetch_stub::{
        fetch_stub_test, get_request_param, global, json_ok, network_error, server_error, wait,
        Error, HttpClient, RequestData,
    };
    use serde_json::{json, Value};

    #[fetch_stub_test]
    async fn get_handler_answers_get_requests() {
        let interception = global().on_get(|request| {
            let id = get_request_param(&request.uri, "id")?;
            Some(json_ok(&json!({ "id": id })))
        });

        let response = global()
            .client()
            .fetch(RequestData::get("https://api.test/users?id=42"))
            .await
            .unwrap();

        assert_eq!(response.json::<Value>().unwrap(), json!({"id": "42"}));
        assert_eq!(interception.call_count(), 1);
    }

    #[fetch_stub_test]
    async fn post_waits_until_the_test_responds() {
        let interception = global().on_get(|_| Some(server_error(500, "unused")));
        let client = global().client();

        let request =
            client.fetch(RequestData::post("https://api.test/users").with_body(r#"{"name":"Ada"}"#));
        let respond = async {
            while interception.call_count() == 0 {
                wait().await;
            }
            interception
                .respond(json_ok(&json!({"created": true})))
                .unwrap();
        };
        let (response, ()) = futures::join!(request, respond);

        assert_eq!(
            response.unwrap().json::<Value>().unwrap(),
            json!({"created": true})
        );
    }

    #[fetch_stub_test]
    async fn simulated_network_failure() {
        let _interception = global().on_request(|_| Some(network_error("dns lookup failed")));

        let error = global()
            .client()
            .fetch(RequestData::get("https://api.test/"))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Network(_)));
    }

    #[fetch_stub_test]
    async fn every_test_starts_without_an_interception() {
        assert!(!global().is_intercepting());
    }
}
