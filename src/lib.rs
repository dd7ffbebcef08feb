//! Room coordination for turn-based multiplayer games.
//!
//! `gametable` keeps one [`room::Room`] per play session. A room owns the live
//! client connections and a pluggable [`game::Game`] state machine, and is the
//! single authority over slot claims, manager election, action dispatch and the
//! personalized state broadcasts that keep every client's view consistent.
//!
//! Transports plug in through the [`connection::SinkAdapter`] and
//! [`connection::StreamAdapter`] seams; [`server`] provides the axum WebSocket
//! transport plus the HTTP endpoint that allocates rooms, and [`registry`]
//! tracks live rooms by their short join code.

pub mod connection;
pub mod dispatcher;
pub mod game;
pub mod message;
pub mod registry;
pub mod response;
pub mod room;
pub mod server;
