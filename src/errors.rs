//! Error types for the authentication gate
//!
//! Every failure the gate can hit is terminal and maps to an HTTP rejection
//! with a JSON body; nothing propagates past the middleware boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failure modes of the authentication gate.
#[derive(Debug)]
pub enum AuthError {
    /// The configured token header was absent or empty
    MissingCredential { header: String },

    /// The auth service answered with a non-200 status
    InvalidCredential { status: u16 },

    /// The auth service could not be reached
    UpstreamUnreachable { reason: String },

    /// The auth service answered 200 with a body that is not a JSON object
    MalformedUpstreamResponse { reason: String },

    /// The validation response carries no string value under the identity field
    MissingIdentityClaim { field: String },
}

impl AuthError {
    /// Status code of the rejection written to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential { .. } | AuthError::InvalidCredential { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::UpstreamUnreachable { .. }
            | AuthError::MalformedUpstreamResponse { .. }
            | AuthError::MissingIdentityClaim { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Message sent to the client. Upstream details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            AuthError::MissingCredential { header } => format!("{} header required", header),
            AuthError::InvalidCredential { .. } => "Invalid token".to_string(),
            AuthError::UpstreamUnreachable { .. } => {
                "Failed to communicate with auth service".to_string()
            }
            AuthError::MalformedUpstreamResponse { .. } => {
                "Failed to parse auth service response".to_string()
            }
            AuthError::MissingIdentityClaim { .. } => {
                "Invalid response from auth service".to_string()
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredential { header } => {
                write!(f, "'{}' header missing or empty", header)
            }
            AuthError::InvalidCredential { status } => {
                write!(f, "auth service rejected token with status {}", status)
            }
            AuthError::UpstreamUnreachable { reason } => {
                write!(f, "auth service unreachable: {}", reason)
            }
            AuthError::MalformedUpstreamResponse { reason } => {
                write!(f, "unparsable auth service response: {}", reason)
            }
            AuthError::MissingIdentityClaim { field } => {
                write!(f, "auth service response has no string '{}' field", field)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.client_message() });
        (self.status_code(), Json(body)).into_response()
    }
}
