//! Gate configuration
//!
//! Holds the address of the auth service plus the header, scheme prefix, and
//! response field names the gate works with. Everything except the auth
//! service URL has a default matching the common bearer-token setup.

use serde::{Deserialize, Serialize};

/// Configuration for [`AuthGate`](crate::middleware::AuthGate).
///
/// Built once at startup and shared read-only across requests. Loading this
/// from a file or the environment is the host application's job; the type
/// only guarantees that unset fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Base URL of the auth service, e.g. `http://auth.internal:9100`.
    pub auth_service_url: String,

    /// Path appended to the base URL for the validation call.
    #[serde(default = "default_validate_path")]
    pub validate_path: String,

    /// Header read from the incoming request and set on the validation call.
    #[serde(default = "default_token_header")]
    pub token_header: String,

    /// Scheme prefix stripped from the incoming header value and re-applied
    /// when forwarding the token upstream.
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,

    /// Field of the validation response body that carries the user id.
    #[serde(default = "default_identity_field")]
    pub identity_field: String,
}

fn default_validate_path() -> String {
    "/validate".to_string()
}

fn default_token_header() -> String {
    "Authorization".to_string()
}

fn default_token_prefix() -> String {
    "Bearer ".to_string()
}

fn default_identity_field() -> String {
    "user_id".to_string()
}

impl GateConfig {
    /// Create a configuration with defaults for everything but the auth
    /// service URL.
    pub fn new(auth_service_url: impl Into<String>) -> Self {
        Self {
            auth_service_url: auth_service_url.into(),
            validate_path: default_validate_path(),
            token_header: default_token_header(),
            token_prefix: default_token_prefix(),
            identity_field: default_identity_field(),
        }
    }

    pub fn with_validate_path(mut self, path: impl Into<String>) -> Self {
        self.validate_path = path.into();
        self
    }

    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    /// Full URL of the validation endpoint.
    pub fn validate_url(&self) -> String {
        format!("{}{}", self.auth_service_url, self.validate_path)
    }
}
