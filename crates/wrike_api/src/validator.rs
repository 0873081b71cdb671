//! One-shot token validation against the current-identity endpoint.

use reqwest::Method;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::info;

use crate::client::{Payload, WrikeClient};
use crate::config::WrikeConfig;
use crate::error::WrikeError;
use crate::models::User;

const UNKNOWN_ERROR: &str = "Unknown error occurred";
const NO_USER_DATA: &str = "No user data returned";

/// Result of validating a candidate token. Always a value, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid { identity: User },
    Invalid { reason: String },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    fn invalid(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            ValidationOutcome::Invalid {
                reason: UNKNOWN_ERROR.to_string(),
            }
        } else {
            ValidationOutcome::Invalid { reason }
        }
    }
}

/// Serialized as `{valid: true, identity}` or `{valid: false, reason}`.
impl Serialize for ValidationOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ValidationOutcome", 2)?;
        match self {
            ValidationOutcome::Valid { identity } => {
                state.serialize_field("valid", &true)?;
                state.serialize_field("identity", identity)?;
            }
            ValidationOutcome::Invalid { reason } => {
                state.serialize_field("valid", &false)?;
                state.serialize_field("reason", reason)?;
            }
        }
        state.end()
    }
}

/// Probes `GET /contacts?me=true` with `token` and classifies the outcome.
/// `config` supplies the base URL and user agent; its token is ignored.
pub async fn validate_token(config: &WrikeConfig, token: &str) -> ValidationOutcome {
    let client = match WrikeClient::new(config.clone().with_token(token)) {
        Ok(client) => client,
        Err(err) => return ValidationOutcome::invalid(err.to_string()),
    };

    let users = client
        .request::<User>(Method::GET, "contacts", &[("me", "true")], Payload::Empty)
        .await;

    match users {
        Ok(users) => match users.into_iter().next() {
            Some(identity) => {
                info!(user_id = %identity.id, "token validated");
                ValidationOutcome::Valid { identity }
            }
            None => ValidationOutcome::invalid(NO_USER_DATA),
        },
        Err(WrikeError::Api {
            status,
            status_text,
            ..
        }) => ValidationOutcome::invalid(format!(
            "Authentication failed ({}): {}",
            status.as_u16(),
            status_text
        )),
        Err(err) => ValidationOutcome::invalid(err.to_string()),
    }
}
