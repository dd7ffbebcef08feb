//! Routes one inbound action to its handler and reports failures to the
//! sender without ever taking the room down.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::connection::SinkAdapter;
use crate::game::{Game, GameError};
use crate::message::{ActionParseError, ClientAction};
use crate::response::Outbound;
use crate::room::Room;

/// The only thing a client learns about an unexpected failure.
pub const SERVER_ERROR_REPLY: &str = "Server error while handling your action";

/// How a handler failed. `Client` is an expected validation outcome whose
/// message goes to the sender verbatim; `Server` is a bug or garbage input,
/// logged in full while the sender gets only [`SERVER_ERROR_REPLY`].
#[derive(Debug, Error)]
enum DispatchError {
    #[error("{0}")]
    Client(String),
    #[error("{0}")]
    Server(String),
}

impl From<GameError> for DispatchError {
    fn from(err: GameError) -> Self {
        DispatchError::Client(err.to_string())
    }
}

/// Handle one decoded envelope from `client_id`, mutating the room and
/// broadcasting as the action dictates. All failures end as a reply to the
/// sender only; other clients never observe a failed action.
pub async fn dispatch<S: SinkAdapter>(room: &mut Room<S>, client_id: &str, envelope: &Value) {
    let action = match ClientAction::parse(envelope) {
        Ok(action) => action,
        Err(ActionParseError::UnknownAction(name)) => {
            info!(client_id, action = %name, "unknown action");
            room.send_to(client_id, Outbound::error(format!("Unknown action: {name}")))
                .await;
            return;
        }
        Err(err @ ActionParseError::MalformedPayload { .. }) => {
            error!(client_id, room = room.code(), error = %err, "rejected malformed envelope");
            room.send_to(client_id, Outbound::error(SERVER_ERROR_REPLY))
                .await;
            return;
        }
    };

    if let Err(err) = run_action(room, client_id, action).await {
        match err {
            DispatchError::Client(message) => {
                info!(client_id, message = %message, "action rejected");
                room.send_to(client_id, Outbound::error(message)).await;
            }
            DispatchError::Server(detail) => {
                error!(client_id, room = room.code(), detail = %detail, "action handler failed");
                room.send_to(client_id, Outbound::error(SERVER_ERROR_REPLY))
                    .await;
            }
        }
    }
}

async fn run_action<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
    action: ClientAction,
) -> Result<(), DispatchError> {
    match action {
        ClientAction::ClaimSlot { slot } => claim_slot(room, client_id, slot).await,
        ClientAction::UpdateName { slot, name } => update_name(room, client_id, slot, name).await,
        ClientAction::ClaimManager => claim_manager(room, client_id).await,
        ClientAction::ReleaseSlot => release_slot(room, client_id).await,
        ClientAction::StartGame => start_game(room, client_id).await,
        ClientAction::TakeTurn { turn } => take_turn(room, client_id, &turn).await,
    }
}

async fn claim_slot<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
    slot: usize,
) -> Result<(), DispatchError> {
    if room.game().roster().player(slot).is_none() {
        return Err(DispatchError::Server(format!("no such slot {slot}")));
    }
    if room.claim_slot(slot, client_id).await {
        Ok(())
    } else {
        Err(DispatchError::Client(format!("Slot {slot} already claimed")))
    }
}

async fn update_name<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
    slot: usize,
    name: String,
) -> Result<(), DispatchError> {
    if room.game().roster().player(slot).is_none() {
        return Err(DispatchError::Server(format!("no such slot {slot}")));
    }
    if room.game().roster().client_at(slot) != Some(client_id) {
        return Err(DispatchError::Client(format!(
            "Cannot change name for slot={slot}"
        )));
    }
    info!(client_id, slot, name = %name, "updating display name");
    if let Some(player) = room.game_mut().roster_mut().player_mut(slot) {
        player.display_name = name;
    }
    room.broadcast_slots().await;
    Ok(())
}

async fn claim_manager<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
) -> Result<(), DispatchError> {
    if room.set_manager(client_id).await {
        Ok(())
    } else {
        Err(DispatchError::Client("Could not claim manager".to_string()))
    }
}

async fn release_slot<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
) -> Result<(), DispatchError> {
    if !room.release_slot(client_id).await {
        return Err(DispatchError::Client(
            "No slot associated with client".to_string(),
        ));
    }
    if room.game().roster().is_started() {
        room.send_game_state().await;
    }
    Ok(())
}

async fn start_game<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
) -> Result<(), DispatchError> {
    if room.game().roster().manager() != Some(client_id) {
        return Err(GameError::NotManager.into());
    }
    room.game_mut().start_game()?;
    room.broadcast(Outbound::info("Game started")).await;
    room.send_game_state().await;
    Ok(())
}

async fn take_turn<S: SinkAdapter>(
    room: &mut Room<S>,
    client_id: &str,
    turn: &Value,
) -> Result<(), DispatchError> {
    room.game_mut().submit_action(client_id, turn, None)?;
    room.send_game_state().await;
    Ok(())
}
