//! The game state-machine contract and the seat roster shared by every game.
mod test;

pub mod pebble;

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failures a game can report back to the acting client.
///
/// These are expected outcomes of normal play, not process failures: the
/// dispatcher forwards the display string to the offending client and nothing
/// else happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Not your turn!")]
    NotYourTurn,
    #[error("Invalid action")]
    InvalidAction,
    #[error("Game already started")]
    AlreadyStarted,
    #[error("Cannot start game with no players")]
    NoPlayersConnected,
    #[error("Only the manager can start the game")]
    NotManager,
}

/// A fixed seat in a game, bound to at most one connected client at a time.
///
/// Players are created once, when the game is constructed, and live as long as
/// the room does; claiming and releasing a seat only flips `client_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub slot_index: usize,
    pub display_name: String,
    pub client_id: Option<String>,
}

impl Player {
    pub fn new(slot_index: usize) -> Self {
        Player {
            slot_index,
            display_name: format!("Player {slot_index}"),
            client_id: None,
        }
    }
}

/// Seat map, manager election state and the started flag.
///
/// Every concrete game embeds one of these and exposes it through
/// [`Game::roster`], which gives the room a uniform view of who sits where
/// without knowing anything about the rules.
#[derive(Debug, Default)]
pub struct Roster {
    players: BTreeMap<usize, Player>,
    manager: Option<String>,
    started: bool,
}

impl Roster {
    /// A roster with seats indexed `0..seats`, all unclaimed.
    pub fn with_seats(seats: usize) -> Self {
        Roster {
            players: (0..seats).map(|i| (i, Player::new(i))).collect(),
            manager: None,
            started: false,
        }
    }

    pub fn players(&self) -> &BTreeMap<usize, Player> {
        &self.players
    }

    pub fn player(&self, slot: usize) -> Option<&Player> {
        self.players.get(&slot)
    }

    pub fn player_mut(&mut self, slot: usize) -> Option<&mut Player> {
        self.players.get_mut(&slot)
    }

    pub fn seat_count(&self) -> usize {
        self.players.len()
    }

    /// The seat a client currently occupies, if any.
    pub fn slot_of(&self, client_id: &str) -> Option<usize> {
        self.players
            .values()
            .find(|p| p.client_id.as_deref() == Some(client_id))
            .map(|p| p.slot_index)
    }

    /// The client occupying a seat, if any.
    pub fn client_at(&self, slot: usize) -> Option<&str> {
        self.players.get(&slot).and_then(|p| p.client_id.as_deref())
    }

    /// Per-seat availability: `true` means the seat is free to claim.
    pub fn availability(&self) -> BTreeMap<usize, bool> {
        self.players
            .iter()
            .map(|(slot, p)| (*slot, p.client_id.is_none()))
            .collect()
    }

    /// Per-seat display names; `None` for seats without a client.
    pub fn names(&self) -> BTreeMap<usize, Option<String>> {
        self.players
            .iter()
            .map(|(slot, p)| {
                let name = p.client_id.is_some().then(|| p.display_name.clone());
                (*slot, name)
            })
            .collect()
    }

    pub fn any_seat_claimed(&self) -> bool {
        self.players.values().any(|p| p.client_id.is_some())
    }

    pub fn manager(&self) -> Option<&str> {
        self.manager.as_deref()
    }

    pub fn set_manager(&mut self, client_id: Option<String>) {
        self.manager = client_id;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Startedness is monotonic: there is deliberately no way back.
    pub fn mark_started(&mut self) {
        self.started = true;
    }
}

/// The contract every concrete game implements.
///
/// The room holds the active game as a `Box<dyn Game>` and drives it purely
/// through this interface, so game payloads are type-erased
/// [`serde_json::Value`]s rather than per-game types.
pub trait Game: Send {
    fn roster(&self) -> &Roster;

    fn roster_mut(&mut self) -> &mut Roster;

    /// State visible to every client. Must be side-effect free and
    /// independent of who is asking.
    fn public_state(&self) -> Value;

    /// State visible only to `client_id`, e.g. the actions available to them.
    fn private_state(&self, client_id: &str) -> Value;

    /// Validate and apply one turn action for `client_id`.
    ///
    /// `force_turn_for` exists solely so the room can play a deterministic
    /// "pass" on behalf of a disconnecting active player. It narrows, never
    /// widens, who may act: when given, the action is accepted only for
    /// `client_id == force_turn_for`.
    fn submit_action(
        &mut self,
        client_id: &str,
        action: &Value,
        force_turn_for: Option<&str>,
    ) -> Result<(), GameError>;

    /// The client expected to act next, or `None` if there is none.
    fn current_player(&self) -> Option<String>;

    fn is_game_over(&self) -> bool;

    /// Winner payload once the game is over, empty object before that.
    fn final_result(&self) -> Value;

    /// Transition from not-started to started and return the public state
    /// after the transition.
    fn start_game(&mut self) -> Result<Value, GameError> {
        if !self.roster().any_seat_claimed() {
            return Err(GameError::NoPlayersConnected);
        }
        if self.roster().is_started() {
            return Err(GameError::AlreadyStarted);
        }
        self.roster_mut().mark_started();
        Ok(self.public_state())
    }
}
