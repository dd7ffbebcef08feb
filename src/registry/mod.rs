//! Live rooms by join code.
mod test;

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::info;

use crate::connection::SinkAdapter;
use crate::game::Game;
use crate::room::Room;

const CODE_LEN: usize = 4;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Allocate a join code: `CODE_LEN` characters drawn from uppercase letters
/// and digits. Uniqueness is the registry's job, not this function's.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Owns every live room and hands them out behind a per-room mutex, which is
/// the serialization point for all of that room's events. The registry has an
/// explicit lifecycle: rooms enter through [`create`](Self::create) and leave
/// through [`remove_if_empty`](Self::remove_if_empty) when their last
/// connection is gone.
pub struct RoomRegistry<S: SinkAdapter> {
    rooms: Mutex<HashMap<String, Arc<Mutex<Room<S>>>>>,
}

impl<S: SinkAdapter> RoomRegistry<S> {
    pub fn new() -> Self {
        RoomRegistry {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Register a room around `game` under a freshly allocated, collision-free
    /// code, and return the code.
    pub async fn create(&self, game: Box<dyn Game>) -> String {
        let mut rooms = self.rooms.lock().await;
        let code = loop {
            let candidate = generate_code();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::new(code.clone(), game);
        rooms.insert(code.clone(), Arc::new(Mutex::new(room)));
        info!(code = %code, rooms = rooms.len(), "room created");
        code
    }

    pub async fn lookup(&self, code: &str) -> Option<Arc<Mutex<Room<S>>>> {
        self.rooms.lock().await.get(code).cloned()
    }

    /// Delete the room if its connection map is empty, releasing the game and
    /// freeing the code. Returns whether a deletion happened.
    pub async fn remove_if_empty(&self, code: &str) -> bool {
        let mut rooms = self.rooms.lock().await;
        let empty = match rooms.get(code) {
            Some(room) => room.lock().await.is_empty(),
            None => return false,
        };
        if empty {
            rooms.remove(code);
            info!(code = %code, rooms = rooms.len(), "room closed");
        }
        empty
    }

    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }
}

impl<S: SinkAdapter> Default for RoomRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
