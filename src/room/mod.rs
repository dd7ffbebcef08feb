//! One play session: the live connections, the game, and every broadcast.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::connection::SinkAdapter;
use crate::game::Game;
use crate::response::{GameStatePayload, Outbound, SlotTable, SlotsPayload, WelcomePayload};

/// The coordination object for one session.
///
/// A room exclusively owns its game and its connection map; every mutation of
/// either goes through a method here. Callers are expected to serialize access
/// per room (the registry hands rooms out behind a mutex), so within one event
/// the room never observes interleaved handlers.
///
/// Sends are fire-and-forget: a failed or disconnected sink is skipped with a
/// debug log and never blocks delivery to the other clients.
pub struct Room<S: SinkAdapter> {
    code: String,
    game: Box<dyn Game>,
    connections: HashMap<String, S>,
}

impl<S: SinkAdapter> Room<S> {
    pub fn new(code: String, game: Box<dyn Game>) -> Self {
        Room {
            code,
            game,
            connections: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn game(&self) -> &dyn Game {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> &mut dyn Game {
        self.game.as_mut()
    }

    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.connections.contains_key(client_id)
    }

    /// Register a connection. Joining never assigns a seat; seats are claimed
    /// explicitly by the client.
    pub fn join(&mut self, client_id: String, sink: S) {
        self.connections.insert(client_id, sink);
    }

    /// Reply to a single client. Unknown ids and failed sends are dropped.
    pub async fn send_to(&mut self, client_id: &str, payload: Outbound) {
        if let Some(conn) = self.connections.get_mut(client_id) {
            if let Err(err) = conn.send(payload).await {
                debug!(client_id, error = %err, "dropping undeliverable payload");
            }
        }
    }

    /// Fan one personalized payload out to every connected client. The
    /// transform must not touch the room, which keeps it independently
    /// testable and the borrow simple.
    async fn broadcast_each<F>(&mut self, personalize: F)
    where
        F: Fn(&str) -> Outbound,
    {
        for (client_id, conn) in self.connections.iter_mut() {
            if !conn.is_connected() {
                continue;
            }
            if let Err(err) = conn.send(personalize(client_id)).await {
                debug!(client_id = %client_id, error = %err, "skipping failed send");
            }
        }
    }

    /// Send an identical payload to every connected client.
    pub async fn broadcast(&mut self, payload: Outbound) {
        self.broadcast_each(|_| payload.clone()).await;
    }

    /// The slot table as every client may see it.
    pub fn slot_table(&self) -> SlotTable {
        let roster = self.game.roster();
        SlotTable {
            num_connections: self.connections.len(),
            available_slots: roster.availability(),
            names: roster.names(),
        }
    }

    /// Greet a newly attached client with its generated id and the current
    /// slot table.
    pub async fn send_welcome(&mut self, client_id: &str) {
        let payload = Outbound::Welcome(WelcomePayload {
            client_id: client_id.to_string(),
            slots: self.slot_table(),
            my_slot: None,
        });
        self.send_to(client_id, payload).await;
    }

    /// Broadcast the slot table, telling each recipient which seat is theirs.
    pub async fn broadcast_slots(&mut self) {
        let table = self.slot_table();
        let seats: HashMap<String, usize> = self
            .game
            .roster()
            .players()
            .values()
            .filter_map(|p| p.client_id.clone().map(|id| (id, p.slot_index)))
            .collect();
        self.broadcast_each(move |client_id| {
            Outbound::Slots(SlotsPayload {
                slots: table.clone(),
                my_slot: seats.get(client_id).copied(),
            })
        })
        .await;
    }

    /// Bind a seat to a client and broadcast the new slot table.
    ///
    /// Returns `false` without mutating or broadcasting when the seat does not
    /// exist, is already taken, or the client already holds a seat (a client
    /// occupies at most one).
    pub async fn claim_slot(&mut self, slot: usize, client_id: &str) -> bool {
        let roster = self.game.roster_mut();
        if roster.slot_of(client_id).is_some() {
            return false;
        }
        match roster.player_mut(slot) {
            Some(player) if player.client_id.is_none() => {
                player.client_id = Some(client_id.to_string());
            }
            _ => return false,
        }
        info!(client_id, slot, "slot claimed");
        self.broadcast_slots().await;
        true
    }

    /// Release the seat a client holds, if any, and broadcast the new table.
    ///
    /// When the game is running and the releasing client is the player whose
    /// turn it is, a "pass" is submitted on their behalf first, while the seat
    /// binding is still theirs, so the turn can never stall on a vanished
    /// player.
    pub async fn release_slot(&mut self, client_id: &str) -> bool {
        let Some(slot) = self.game.roster().slot_of(client_id) else {
            return false;
        };
        if self.game.roster().is_started()
            && self.game.current_player().as_deref() == Some(client_id)
        {
            info!(client_id, "current player released slot, taking forced pass");
            let pass = json!({ "action": "pass" });
            if let Err(err) = self.game.submit_action(client_id, &pass, Some(client_id)) {
                warn!(client_id, error = %err, "forced pass rejected");
            }
        }
        if let Some(player) = self.game.roster_mut().player_mut(slot) {
            player.client_id = None;
        }
        self.broadcast_slots().await;
        true
    }

    /// Elect a manager. Succeeds only while the seat of power is empty;
    /// returns `false` with no mutation and no broadcast otherwise.
    pub async fn set_manager(&mut self, client_id: &str) -> bool {
        if self.game.roster().manager().is_some() {
            return false;
        }
        self.game
            .roster_mut()
            .set_manager(Some(client_id.to_string()));
        let who = match self.game.roster().slot_of(client_id) {
            Some(slot) => format!("Player {slot}"),
            None => "A spectator".to_string(),
        };
        info!(client_id, "manager elected");
        self.broadcast(Outbound::info(format!("{who} is the manager now")))
            .await;
        self.send_to(client_id, Outbound::info("You are the manager"))
            .await;
        true
    }

    /// Clear the manager. Re-election is explicit; nobody is promoted here.
    pub async fn release_manager(&mut self) {
        self.game.roster_mut().set_manager(None);
        self.broadcast(Outbound::info("There is no manager")).await;
    }

    /// Send each connected client its personalized view of the game.
    pub async fn send_game_state(&mut self) {
        let game = self.game.as_ref();
        let current = game.current_player();
        let is_over = game.is_game_over();
        let public = game.public_state();
        let payloads: HashMap<String, Outbound> = self
            .connections
            .keys()
            .map(|client_id| {
                let payload = Outbound::GameState(GameStatePayload {
                    public_state: public.clone(),
                    private_state: game.private_state(client_id),
                    your_turn: current.as_deref() == Some(client_id.as_str()),
                    is_over,
                    final_result: is_over.then(|| game.final_result()),
                });
                (client_id.clone(), payload)
            })
            .collect();
        for (client_id, conn) in self.connections.iter_mut() {
            if !conn.is_connected() {
                continue;
            }
            let Some(payload) = payloads.get(client_id) else {
                continue;
            };
            if let Err(err) = conn.send(payload.clone()).await {
                debug!(client_id = %client_id, error = %err, "skipping failed send");
            }
        }
    }

    /// Detach a client: drop its connection, free its seat (auto-passing if
    /// it was their turn), and vacate the manager role if they held it.
    ///
    /// Returns `true` when this was the last connection, in which case the
    /// caller is expected to delete the room.
    pub async fn leave(&mut self, client_id: &str) -> bool {
        self.connections.remove(client_id);
        let started = self.game.roster().is_started();
        let had_slot = self.release_slot(client_id).await;
        if !had_slot {
            // No seat to release, but the connection count still changed.
            self.broadcast_slots().await;
        }
        if had_slot && started {
            self.send_game_state().await;
        }
        if self.game.roster().manager() == Some(client_id) {
            self.release_manager().await;
        }
        self.is_empty()
    }
}
