//! Gateway call failures.

use thiserror::Error;

/// Classification of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// The gateway answered with a non-success HTTP status.
    HttpError,
    /// The gateway answered 2xx but the body was not the expected JSON.
    JsonDecodeError,
    /// Connection, TLS or timeout failure before a response arrived.
    NetworkError,
    /// Anything else.
    UnhandledError,
}

impl GatewayErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayErrorKind::HttpError => "http_error",
            GatewayErrorKind::JsonDecodeError => "json_decode_error",
            GatewayErrorKind::NetworkError => "network_error",
            GatewayErrorKind::UnhandledError => "unhandled_error",
        }
    }
}

impl std::fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed call to the payment gateway.
///
/// `payload` keeps the raw response body for logging. It is never returned
/// to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
    pub payload: Option<String>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            payload: None,
        }
    }

    pub fn http(status_code: u16, payload: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::HttpError,
            message: format!("Gateway returned HTTP {}", status_code),
            status_code: Some(status_code),
            payload: Some(payload.into()),
        }
    }

    pub fn json_decode(message: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::JsonDecodeError,
            message: message.into(),
            status_code: None,
            payload: Some(payload.into()),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NetworkError, message)
    }

    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::UnhandledError, message)
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status_and_payload() {
        let err = GatewayError::http(401, r#"{"detail":"incorrect credentials"}"#);

        assert_eq!(err.kind, GatewayErrorKind::HttpError);
        assert_eq!(err.status_code, Some(401));
        assert!(err.payload.as_deref().unwrap().contains("incorrect credentials"));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = GatewayError::network("connection reset");
        assert_eq!(err.to_string(), "network_error: connection reset");
    }

    #[test]
    fn json_decode_error_has_no_status_by_default() {
        let err = GatewayError::json_decode("missing field `token`", "{}").with_status(201);
        assert_eq!(err.kind, GatewayErrorKind::JsonDecodeError);
        assert_eq!(err.status_code, Some(201));
    }
}
