//! Error types for request building, transport and response resolution.
//!
//! # Design
//! `Network` and `JsonParse` are the two classified failures a caller is
//! expected to handle. `Transport` covers the case where no response exists
//! at all, so it carries neither status nor body. `NotOk` is the resolved but
//! non-`2xx` raw response surfaced by the request factory. `Decode` is the
//! unclassified text decoding failure.

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::http::{HttpResponse, ResponseBody};

/// Errors produced by the request factory and the network façade.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Status code outside `[200, 400)`, whether or not the body decoded.
    #[error("Received {status} response from server.")]
    Network { status: u16, body: ResponseBody },

    /// JSON decoding failed on a response whose status was otherwise fine.
    #[error("Failed to parse response from server.")]
    JsonParse { status: u16, raw_body: Option<String> },

    /// No response could be obtained (unreachable host, aborted request).
    #[error("No response received: {reason}")]
    Transport { reason: String },

    /// The response resolved but the transport did not report it as `ok`.
    /// `raw` is the failed response itself, headers included.
    #[error("Received non-ok {status} response from server.")]
    NotOk {
        status: u16,
        body: ResponseBody,
        raw: HttpResponse,
    },

    /// The response body was not valid UTF-8 text.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] FromUtf8Error),

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. }
            | FetchError::JsonParse { status, .. }
            | FetchError::NotOk { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            FetchError::Network { body, .. } | FetchError::NotOk { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The raw response behind a `NotOk`; other failures never kept one.
    pub fn raw(&self) -> Option<&HttpResponse> {
        match self {
            FetchError::NotOk { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// `true` for the two classified kinds callers normally branch on.
    pub fn is_classified(&self) -> bool {
        matches!(self, FetchError::Network { .. } | FetchError::JsonParse { .. })
    }
}

/// Failure reported by a `Transport` before any response existed.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Transport { reason: err.0 }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Errors raised while loading or validating a `NetworkConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_message_names_status() {
        let err = FetchError::Network {
            status: 503,
            body: ResponseBody::Text("down".to_string()),
        };
        assert_eq!(err.to_string(), "Received 503 response from server.");
        assert_eq!(err.status(), Some(503));
        assert!(err.is_classified());
    }

    #[test]
    fn transport_failure_has_no_status_or_body() {
        let err = FetchError::from(TransportError("connection refused".to_string()));
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert!(!err.is_classified());
    }

    #[test]
    fn json_parse_error_carries_status() {
        let err = FetchError::JsonParse {
            status: 200,
            raw_body: Some("{oops".to_string()),
        };
        assert_eq!(err.status(), Some(200));
        assert!(err.body().is_none());
    }

    #[test]
    fn not_ok_keeps_raw_response() {
        let raw = HttpResponse::new(302, vec![("Location".to_string(), "/new".to_string())], "moved");
        let err = FetchError::NotOk {
            status: 302,
            body: ResponseBody::Text("moved".to_string()),
            raw,
        };
        assert_eq!(err.raw().and_then(|raw| raw.header("location")), Some("/new"));
        assert!(!err.is_classified());
        assert!(FetchError::from(TransportError("x".to_string())).raw().is_none());
    }
}
