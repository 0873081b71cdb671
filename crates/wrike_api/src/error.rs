//! Error model used by Wrike API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrikeError>;

/// Failure of a Wrike API call. The rendered text of `Api` always carries the
/// numeric status and its reason phrase because callers classify failures by
/// matching on the message.
#[derive(Debug, Error)]
pub enum WrikeError {
    #[error("Wrike API Error: {} {status_text} - {body}", .status.as_u16())]
    Api {
        status: StatusCode,
        status_text: String,
        body: String,
    },
    #[error("{0}")]
    Transport(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("empty response from {0}")]
    EmptyResponse(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl WrikeError {
    /// Builds the error for a non-2xx response.
    pub fn api(status: StatusCode, body: impl Into<String>) -> Self {
        WrikeError::Api {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.into(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WrikeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WrikeError {
    /// Network-level failures carry whatever the transport reports.
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WrikeError::Serialization(err.to_string())
        } else {
            WrikeError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WrikeError {
    fn from(err: serde_json::Error) -> Self {
        WrikeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_embeds_status_and_reason() {
        let err = WrikeError::api(StatusCode::UNAUTHORIZED, "{\"error\":\"not_authorized\"}");
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Unauthorized"));
        assert_eq!(
            message,
            "Wrike API Error: 401 Unauthorized - {\"error\":\"not_authorized\"}"
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn transport_error_renders_message_verbatim() {
        let err = WrikeError::Transport("dns error: no such host".into());
        assert_eq!(err.to_string(), "dns error: no such host");
        assert_eq!(err.status(), None);
    }
}
