//! Error types for the Merit API client.
//!
//! # Design
//! Every failure a caller can observe is one variant of `MeritError`. The
//! four status codes the Merit API documents (400, 401, 404, 500) get
//! dedicated variants so callers can branch on them; any other non-2xx status
//! lands in `Api`. `Transport` means no response was received at all and so
//! carries no status code. `Decode` covers a 2xx response whose body does not
//! match the expected record shape.
//!
//! Classification happens in exactly one place, `MeritError::from_response`.
//! Resource clients propagate the result unchanged.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Fields shared by every error that originates from an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub request_id: Option<String>,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " (request id {request_id})")?;
        }
        Ok(())
    }
}

/// Errors returned by every Merit API operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeritError {
    /// The server returned 400.
    #[error("bad request: {0}")]
    BadRequest(ErrorBody),

    /// The server returned 401; the API key is missing or invalid.
    #[error("unauthorized: {0}")]
    Unauthorized(ErrorBody),

    /// The server returned 404; the requested user or repository does not exist.
    #[error("not found: {0}")]
    NotFound(ErrorBody),

    /// The server returned 500.
    #[error("internal server error: {0}")]
    InternalServer(ErrorBody),

    /// Any other non-2xx status.
    #[error("merit api error: {0}")]
    Api(ErrorBody),

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// A 2xx response whose body could not be decoded into the expected type.
    #[error("failed to decode HTTP {status} response: {message}")]
    Decode { status: u16, message: String },
}

/// Discriminant of `MeritError`, for callers that only need the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServer,
    Api,
    Transport,
    Decode,
}

impl MeritError {
    /// Classify a non-2xx response.
    ///
    /// `message` and `request_id` are read independently from a JSON object
    /// body, so a mistyped field does not discard the other. Without a usable
    /// message the status text is used instead.
    pub fn from_response(status: u16, body: &str, status_text: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty());
        let request_id = payload.get("request_id").and_then(Value::as_str);
        let body = ErrorBody {
            status,
            message: message.unwrap_or(status_text).to_string(),
            request_id: request_id.map(str::to_string),
        };
        match status {
            400 => MeritError::BadRequest(body),
            401 => MeritError::Unauthorized(body),
            404 => MeritError::NotFound(body),
            500 => MeritError::InternalServer(body),
            _ => MeritError::Api(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MeritError::BadRequest(_) => ErrorKind::BadRequest,
            MeritError::Unauthorized(_) => ErrorKind::Unauthorized,
            MeritError::NotFound(_) => ErrorKind::NotFound,
            MeritError::InternalServer(_) => ErrorKind::InternalServer,
            MeritError::Api(_) => ErrorKind::Api,
            MeritError::Transport { .. } => ErrorKind::Transport,
            MeritError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status of the response, or `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            MeritError::Transport { .. } => None,
            MeritError::Decode { status, .. } => Some(*status),
            other => other.body().map(|b| b.status),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            MeritError::Transport { message } | MeritError::Decode { message, .. } => message.as_str(),
            other => other.body().map(|b| b.message.as_str()).unwrap_or_default(),
        }
    }

    /// Server-assigned correlation id, when the error body carried one.
    pub fn request_id(&self) -> Option<&str> {
        self.body().and_then(|b| b.request_id.as_deref())
    }

    fn body(&self) -> Option<&ErrorBody> {
        match self {
            MeritError::BadRequest(body)
            | MeritError::Unauthorized(body)
            | MeritError::NotFound(body)
            | MeritError::InternalServer(body)
            | MeritError::Api(body) => Some(body),
            MeritError::Transport { .. } | MeritError::Decode { .. } => None,
        }
    }
}

/// Failure reported by an `HttpTransport` when no response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for MeritError {
    fn from(err: TransportError) -> Self {
        MeritError::Transport {
            message: err.message,
        }
    }
}

/// Errors raised while resolving a `MeritConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("an API key is required (set MERIT_API_KEY)")]
    MissingApiKey,

    #[error("invalid {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(400, ErrorKind::BadRequest)]
    #[case(401, ErrorKind::Unauthorized)]
    #[case(404, ErrorKind::NotFound)]
    #[case(500, ErrorKind::InternalServer)]
    #[case(403, ErrorKind::Api)]
    #[case(422, ErrorKind::Api)]
    #[case(502, ErrorKind::Api)]
    fn status_maps_to_kind(#[case] status: u16, #[case] kind: ErrorKind) {
        let err = MeritError::from_response(status, r#"{"message":"boom"}"#, "ignored");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn not_found_keeps_message_and_request_id() {
        let err = MeritError::from_response(
            404,
            r#"{"message":"user not found","request_id":"abc"}"#,
            "Not Found",
        );
        assert!(matches!(err, MeritError::NotFound(_)));
        assert_eq!(err.message(), "user not found");
        assert_eq!(err.request_id(), Some("abc"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status_text() {
        let err = MeritError::from_response(500, "<html>oops</html>", "Internal Server Error");
        assert_eq!(err.kind(), ErrorKind::InternalServer);
        assert_eq!(err.message(), "Internal Server Error");
        assert_eq!(err.request_id(), None);
    }

    #[test]
    fn blank_message_falls_back_to_status_text() {
        let err = MeritError::from_response(400, r#"{"message":"  ","request_id":"r1"}"#, "Bad Request");
        assert_eq!(err.message(), "Bad Request");
        assert_eq!(err.request_id(), Some("r1"));
    }

    #[test]
    fn mistyped_message_keeps_request_id() {
        let err = MeritError::from_response(
            404,
            r#"{"message":{"detail":"user not found"},"request_id":"abc"}"#,
            "Not Found",
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.request_id(), Some("abc"));

        let err = MeritError::from_response(500, r#"{"message":"boom","request_id":7}"#, "Internal Server Error");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.request_id(), None);
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = MeritError::from(TransportError::new("connection refused"));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.request_id(), None);
    }

    #[test]
    fn display_includes_request_id() {
        let err = MeritError::from_response(401, r#"{"message":"bad key","request_id":"x1"}"#, "");
        assert_eq!(err.to_string(), "unauthorized: HTTP 401: bad key (request id x1)");
    }
}
