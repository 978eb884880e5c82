//! Inbound event model and the pull-style queue adapter.
//!
//! Events are transported faithfully as opaque structured data; this crate
//! never interprets the business meaning of a payload. The
//! [`MessageQueue`] converts the push-style delivery of the WebSocket task
//! into a blocking pull model so consumers need no callback of their own.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;

/// One decoded event frame from the ARI WebSocket.
///
/// The discriminating `type` tag and the common envelope fields are lifted
/// out; everything else stays in `payload`.
#[derive(Debug, Clone, Deserialize)]
pub struct AriEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub payload: Value,
}

/// One item delivered through a [`MessageQueue`].
#[derive(Debug, Clone)]
pub enum QueueItem {
    Event(AriEvent),
    /// Terminal marker. The producer stops after enqueueing this; items
    /// already queued ahead of it remain consumable in order.
    Error(String),
}

/// Pull adapter over the event stream.
///
/// Strict FIFO: events arrive in receipt order, and a failure shows up as
/// an [`QueueItem::Error`] at the exact position it occurred. After the
/// marker (or a graceful close) the queue yields `None` forever.
#[derive(Debug)]
pub struct MessageQueue {
    rx: mpsc::UnboundedReceiver<QueueItem>,
}

impl MessageQueue {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<QueueItem>) -> Self {
        Self { rx }
    }

    /// Non-blocking poll. `None` means nothing queued right now or the
    /// stream is finished.
    pub fn poll(&mut self) -> Option<QueueItem> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next item. `None` once the stream has terminated and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<QueueItem> {
        self.rx.recv().await
    }
}

/// Producer half held by the WebSocket task.
#[derive(Clone)]
pub(crate) struct QueueSender {
    tx: mpsc::UnboundedSender<QueueItem>,
}

pub(crate) fn queue_pair() -> (QueueSender, MessageQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueSender { tx }, MessageQueue::new(rx))
}

impl QueueSender {
    /// Deliver one event. Returns false once the consumer is gone.
    pub(crate) fn enqueue(&self, event: AriEvent) -> bool {
        self.tx.send(QueueItem::Event(event)).is_ok()
    }

    /// Deliver the terminal error marker.
    pub(crate) fn enqueue_error<S: Into<String>>(&self, reason: S) {
        let _ = self.tx.send(QueueItem::Error(reason.into()));
    }
}
