//! Pass-the-pebble, the reference [`Game`] implementation.
//!
//! One pebble, any number of seats. On your turn the only legal move is to
//! pass the pebble to the next occupied seat; whoever makes the fifth pass
//! wins. Deliberately tiny, so that the coordination layer around it can be
//! exercised end to end.

use serde_json::{json, Map, Value};

use crate::game::{Game, GameError, Roster};

const MAX_PASSES: u32 = 5;

pub struct PassThePebble {
    roster: Roster,
    current_index: usize,
    pass_count: u32,
    max_passes: u32,
    winner: Option<String>,
}

impl PassThePebble {
    pub fn new(seats: usize) -> Self {
        PassThePebble {
            roster: Roster::with_seats(seats),
            current_index: 0,
            pass_count: 0,
            max_passes: MAX_PASSES,
            winner: None,
        }
    }

    /// Actions the client could legally submit right now, keyed by name.
    fn available_actions(&self, client_id: &str) -> Map<String, Value> {
        let mut actions = Map::new();
        if self.roster.client_at(self.current_index) == Some(client_id) {
            actions.insert("pass".to_string(), Value::Null);
        }
        actions
    }

    /// Move the pebble to the next occupied seat, wrapping around. With no
    /// other seat occupied the pebble stays where it is.
    fn advance_holder(&mut self) {
        let seats = self.roster.seat_count();
        for step in 1..=seats {
            let index = (self.current_index + step) % seats;
            if self.roster.client_at(index).is_some() {
                self.current_index = index;
                return;
            }
        }
    }
}

impl Game for PassThePebble {
    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn public_state(&self) -> Value {
        json!({
            "current_holder_index": self.current_index,
            "pass_count": self.pass_count,
            "is_game_over": self.is_game_over(),
        })
    }

    fn private_state(&self, client_id: &str) -> Value {
        json!({
            "available_actions": self.available_actions(client_id),
        })
    }

    fn submit_action(
        &mut self,
        client_id: &str,
        action: &Value,
        force_turn_for: Option<&str>,
    ) -> Result<(), GameError> {
        let on_turn = self.roster.client_at(self.current_index) == Some(client_id)
            && force_turn_for.is_none_or(|forced| forced == client_id);
        if !on_turn {
            return Err(GameError::NotYourTurn);
        }
        if action.get("action").and_then(Value::as_str) != Some("pass") {
            return Err(GameError::InvalidAction);
        }

        self.pass_count += 1;
        if self.pass_count >= self.max_passes {
            self.winner = self
                .roster
                .player(self.current_index)
                .map(|p| p.display_name.clone());
        } else {
            self.advance_holder();
        }
        Ok(())
    }

    fn current_player(&self) -> Option<String> {
        self.roster
            .client_at(self.current_index)
            .map(str::to_string)
    }

    fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    fn final_result(&self) -> Value {
        match &self.winner {
            Some(name) => json!({ "winner": name }),
            None => json!({}),
        }
    }
}
