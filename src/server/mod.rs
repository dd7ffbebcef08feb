//! The axum transport: an HTTP endpoint that allocates rooms and a WebSocket
//! endpoint that attaches clients to them.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::connection::{SinkAdapter, StreamAdapter, TransportError};
use crate::dispatcher;
use crate::game::pebble::PassThePebble;
use crate::game::Game;
use crate::registry::RoomRegistry;
use crate::response::Outbound;
use crate::room::Room;

pub const DEFAULT_SEATS: usize = 2;

/// Outbound half of an axum WebSocket. After the first failed send the sink
/// reports itself disconnected and broadcasts skip it.
pub struct WsSink {
    sink: SplitSink<WebSocket, Message>,
    closed: bool,
}

impl WsSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        WsSink {
            sink,
            closed: false,
        }
    }
}

#[async_trait]
impl SinkAdapter for WsSink {
    async fn send(&mut self, payload: Outbound) -> Result<(), TransportError> {
        let text = serde_json::to_string(&payload)?;
        match self.sink.send(Message::Text(Utf8Bytes::from(text))).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.closed = true;
                Err(Box::new(err))
            }
        }
    }

    fn is_connected(&self) -> bool {
        !self.closed
    }
}

/// Inbound half of an axum WebSocket. Yields text frames; close frames and
/// transport errors end the stream, everything else is ignored.
pub struct WsStream {
    stream: SplitStream<WebSocket>,
}

impl WsStream {
    pub fn new(stream: SplitStream<WebSocket>) -> Self {
        WsStream { stream }
    }
}

#[async_trait]
impl StreamAdapter for WsStream {
    async fn next(&mut self) -> Option<String> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(text.as_str().to_string()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
        None
    }
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry<WsSink>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub game_type: String,
    pub seats: Option<usize>,
}

/// The router serving `POST /create-game` and `GET /ws/{code}`.
pub fn router(registry: Arc<RoomRegistry<WsSink>>) -> Router {
    Router::new()
        .route("/create-game", post(create_game))
        .route("/ws/{code}", get(ws_upgrade))
        .with_state(AppState { registry })
}

/// Instantiate a game by its registered type name.
fn build_game(game_type: &str, seats: usize) -> Option<Box<dyn Game>> {
    match game_type {
        "pass_the_pebble" => Some(Box::new(PassThePebble::new(seats))),
        _ => None,
    }
}

async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> (StatusCode, Json<Value>) {
    let seats = request.seats.unwrap_or(DEFAULT_SEATS);
    match build_game(&request.game_type, seats) {
        Some(game) => {
            let code = state.registry.create(game).await;
            (StatusCode::OK, Json(json!({ "code": code })))
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown game type: {}", request.game_type) })),
        ),
    }
}

async fn ws_upgrade(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, code, state.registry))
        .into_response()
}

/// Read frames from one client and dispatch them, one at a time, under the
/// room lock. Returns when the client disconnects; the caller runs cleanup.
pub async fn run_connection<S, T>(room: Arc<Mutex<Room<S>>>, client_id: &str, stream: &mut T)
where
    S: SinkAdapter,
    T: StreamAdapter,
{
    while let Some(text) = stream.next().await {
        let mut room = room.lock().await;
        match serde_json::from_str::<Value>(&text) {
            Ok(envelope) => dispatcher::dispatch(&mut room, client_id, &envelope).await,
            Err(err) => {
                error!(client_id, error = %err, "unparseable frame");
                room.send_to(client_id, Outbound::error(dispatcher::SERVER_ERROR_REPLY))
                    .await;
            }
        }
    }
}

async fn handle_socket(mut socket: WebSocket, code: String, registry: Arc<RoomRegistry<WsSink>>) {
    let Some(room) = registry.lookup(&code).await else {
        info!(code = %code, "closing connection to unknown room");
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    let client_id = Uuid::new_v4().to_string();
    let (sink, stream) = socket.split();
    {
        let mut room = room.lock().await;
        room.join(client_id.clone(), WsSink::new(sink));
        room.send_welcome(&client_id).await;
        room.broadcast_slots().await;
    }
    info!(code = %code, client_id = %client_id, "client attached");

    let mut stream = WsStream::new(stream);
    run_connection(room.clone(), &client_id, &mut stream).await;

    {
        let mut room = room.lock().await;
        room.leave(&client_id).await;
    }
    registry.remove_if_empty(&code).await;
    info!(code = %code, client_id = %client_id, "client detached");
}
