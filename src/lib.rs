#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod error;
pub mod events;
pub mod http;
pub mod models;
pub mod params;
pub mod resources;
pub mod subscriptions;
pub mod version;
pub mod ws;

pub use client::{Ari, AriConfig};
pub use events::{AriEvent, MessageQueue, QueueItem};
pub use subscriptions::EventSource;
pub use version::{AriVersion, Capability};

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;
