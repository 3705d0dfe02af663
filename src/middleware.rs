//! Bearer-token authentication middleware
//!
//! Wraps protected routes and delegates token validation to the auth service
//! over HTTP. On success the authenticated user id is stored in the request
//! extensions; on failure the request is answered directly and never reaches
//! the inner handler.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::config::GateConfig;
use crate::errors::AuthError;

/// Identity attached to the request extensions once validation passed.
///
/// Handlers behind the gate can take this as an extractor:
///
/// ```ignore
/// async fn profile(user: AuthenticatedUser) -> String {
///     format!("hello {}", user.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the request went through the gate.
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Validates bearer tokens against a remote auth service.
///
/// Holds the configuration and the HTTP client; cloning is cheap and clones
/// share the client's connection pool. No state is carried between requests.
#[derive(Debug, Clone)]
pub struct AuthGate {
    config: GateConfig,
    client: Client,
}

impl AuthGate {
    pub fn new(config: GateConfig) -> Self {
        // No timeout beyond transport defaults - use with_client to set one
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Use a caller-supplied client, e.g. one with timeouts configured.
    pub fn with_client(config: GateConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Pull the raw token out of the configured header.
    ///
    /// A value carrying the configured scheme prefix is stripped; a value
    /// without it is used as-is.
    fn bearer_token(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let value = headers
            .get(self.config.token_header.as_str())
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if value.is_empty() {
            return Err(AuthError::MissingCredential {
                header: self.config.token_header.clone(),
            });
        }

        let token = value
            .strip_prefix(&self.config.token_prefix)
            .unwrap_or(value);

        Ok(token.to_string())
    }

    /// Ask the auth service whether the token is valid and return the user id
    /// it vouches for.
    async fn validate(&self, token: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .get(self.config.validate_url())
            .header(
                self.config.token_header.as_str(),
                format!("{}{}", self.config.token_prefix, token),
            )
            .send()
            .await
            .map_err(|e| AuthError::UpstreamUnreachable {
                reason: e.to_string(),
            })?;

        // Anything other than a plain 200 counts as a rejected token,
        // whatever the body says.
        if response.status() != StatusCode::OK {
            return Err(AuthError::InvalidCredential {
                status: response.status().as_u16(),
            });
        }

        let body: serde_json::Map<String, Value> =
            response
                .json()
                .await
                .map_err(|e| AuthError::MalformedUpstreamResponse {
                    reason: e.to_string(),
                })?;

        match body.get(&self.config.identity_field).and_then(Value::as_str) {
            Some(user_id) => Ok(user_id.to_string()),
            None => Err(AuthError::MissingIdentityClaim {
                field: self.config.identity_field.clone(),
            }),
        }
    }
}

/// Middleware entry point, wired up with `axum::middleware::from_fn_with_state`:
///
/// ```ignore
/// let gate = AuthGate::new(GateConfig::new("http://auth.internal:9100"));
/// let app = Router::new()
///     .route("/profile", get(profile))
///     .layer(middleware::from_fn_with_state(gate, authenticate));
/// ```
pub async fn authenticate(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match gate.bearer_token(req.headers()) {
        Ok(token) => token,
        // Requests without a credential are routine, no log here.
        Err(err) => return err.into_response(),
    };

    match gate.validate(&token).await {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthenticatedUser { user_id });
            next.run(req).await
        }
        Err(err) => {
            warn!(error = %err, "token validation failed");
            err.into_response()
        }
    }
}
