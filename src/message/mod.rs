//! Inbound action envelopes and their parsing.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One client-submitted action, tagged by its `action` field.
///
/// The variant set is the whole dispatch table: adding an action means adding
/// a variant here and a match arm in the dispatcher, and the compiler checks
/// the two stay in sync.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    ClaimSlot { slot: usize },
    UpdateName { slot: usize, name: String },
    ClaimManager,
    ReleaseSlot,
    StartGame,
    TakeTurn { turn: Value },
}

/// Kept in sync with the `ClientAction` variants; used only to tell an
/// unknown action name apart from a known action with a broken payload.
const ACTION_NAMES: &[&str] = &[
    "claim_slot",
    "update_name",
    "claim_manager",
    "release_slot",
    "start_game",
    "take_turn",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionParseError {
    /// The envelope names an action we do not have. Reported to the sender
    /// verbatim, with no other side effect.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    /// A known action whose fields do not deserialize. This is client garbage
    /// or a bug, not a validation outcome.
    #[error("malformed {action:?} payload: {detail}")]
    MalformedPayload { action: String, detail: String },
}

impl ClientAction {
    /// Parse a decoded JSON envelope of the form `{"action": <name>, ...}`.
    pub fn parse(envelope: &Value) -> Result<Self, ActionParseError> {
        let name = match envelope.get("action").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                let tag = envelope.get("action").unwrap_or(&Value::Null);
                return Err(ActionParseError::UnknownAction(tag.to_string()));
            }
        };
        if !ACTION_NAMES.contains(&name.as_str()) {
            return Err(ActionParseError::UnknownAction(name));
        }
        serde_json::from_value(envelope.clone()).map_err(|err| {
            ActionParseError::MalformedPayload {
                action: name,
                detail: err.to_string(),
            }
        })
    }
}
