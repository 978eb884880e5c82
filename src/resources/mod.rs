//! Thin per-resource operation clients.
//!
//! Each client is a stateless command builder over the session's shared
//! transport: it knows the paths, parameters and expected error codes of
//! its resource category and nothing else. Instances are created on demand
//! by the session accessors; only the event stream holds long-lived state.

pub mod applications;
pub mod asterisk;
pub mod bridges;
pub mod channels;
pub mod device_states;
pub mod endpoints;
pub mod events;
pub mod mailboxes;
pub mod playbacks;
pub mod recordings;
pub mod sounds;
