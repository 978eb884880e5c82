//! WebSocket session: connection state machine, keepalive, reconnection.
//!
//! One [`EventConnection`] owns one logical streaming connection. A
//! background task drives the socket (single-writer discipline, so event
//! delivery and disconnect never interleave destructively), publishes state
//! through a watch channel and forwards decoded events to the session's
//! message queue in arrival order.

pub mod config;
pub mod connection;
pub mod error;

pub use config::WsConfig;
pub use connection::{ConnectionState, EventConnection};
pub use error::WsError;
