//! Mock auth service for testing
//!
//! A fake HTTP server standing in for the real auth service. Tests script it
//! to accept or reject tokens and to misbehave in the ways the gate has to
//! survive.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock auth service that simulates validation responses
pub struct MockAuthService {
    pub server: MockServer,
    pub base_url: String,
}

impl MockAuthService {
    /// Create a new mock auth service
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Accept any validation call and vouch for the given user id
    pub async fn mock_valid_token(&self, user_id: &str) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": user_id
            })))
            .mount(&self.server)
            .await;
    }

    /// Accept only validation calls carrying this exact header value
    pub async fn mock_valid_token_for(&self, header_name: &str, header_value: &str, user_id: &str) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .and(header(header_name, header_value))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": user_id
            })))
            .mount(&self.server)
            .await;
    }

    /// Reject every token with the given status
    pub async fn mock_rejected_token(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": "token expired"
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer 200 with a body that is not JSON at all
    pub async fn mock_garbage_body(&self) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&self.server)
            .await;
    }

    /// Answer 200 with valid JSON that is not an object
    pub async fn mock_non_object_body(&self) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["u-42"])))
            .mount(&self.server)
            .await;
    }

    /// Answer 200 with a JSON object lacking the identity field
    pub async fn mock_missing_identity(&self) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "active": true,
                "scope": "read"
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer 200 with a non-string identity value
    pub async fn mock_numeric_identity(&self) {
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": 42
            })))
            .mount(&self.server)
            .await;
    }

    /// Fully customized validation endpoint: path, expected header, and the
    /// field carrying the user id
    pub async fn mock_custom_validation(
        &self,
        validate_path: &str,
        header_name: &str,
        header_value: &str,
        field: &str,
        user_id: &str,
    ) {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), json!(user_id));

        Mock::given(method("GET"))
            .and(path(validate_path))
            .and(header(header_name, header_value))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Object(body)))
            .mount(&self.server)
            .await;
    }

    /// Number of validation calls the mock has received
    pub async fn received_validate_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .len()
    }
}
