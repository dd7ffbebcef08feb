//! Outbound payload shapes produced by the room and serialized by transports.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The slot table common to welcome messages and slot broadcasts: how many
/// clients are attached, which seats are free, and who sits where.
#[derive(Debug, Clone, Serialize)]
pub struct SlotTable {
    pub num_connections: usize,
    pub available_slots: BTreeMap<usize, bool>,
    pub names: BTreeMap<usize, Option<String>>,
}

/// First message a client receives after attaching. `my_slot` is always null
/// here; seats are claimed explicitly, never handed out on join.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomePayload {
    pub client_id: String,
    #[serde(flatten)]
    pub slots: SlotTable,
    pub my_slot: Option<usize>,
}

/// Slot broadcast personalized per recipient: the common table plus the
/// recipient's own seat, so no client has to scan the table for itself.
#[derive(Debug, Clone, Serialize)]
pub struct SlotsPayload {
    #[serde(flatten)]
    pub slots: SlotTable,
    pub my_slot: Option<usize>,
}

/// Game snapshot personalized per recipient. `final_result` stays null until
/// the game is over.
#[derive(Debug, Clone, Serialize)]
pub struct GameStatePayload {
    pub public_state: Value,
    pub private_state: Value,
    pub your_turn: bool,
    pub is_over: bool,
    pub final_result: Option<Value>,
}

/// Every payload the room can emit. Serialization is untagged: each variant
/// writes exactly its own fields, which is the wire contract clients see.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Welcome(WelcomePayload),
    Slots(SlotsPayload),
    Info { info: String },
    Error { error: String },
    GameState(GameStatePayload),
}

impl Outbound {
    pub fn info(message: impl Into<String>) -> Self {
        Outbound::Info {
            info: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Outbound::Error {
            error: message.into(),
        }
    }
}
