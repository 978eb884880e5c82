//! Event stream operation and user event generation.
//!
//! The event stream is the one streaming operation of the protocol: it
//! holds a long-lived WebSocket open and must be closed explicitly. The
//! session tracks it for coordinated teardown and rejects a second
//! concurrent stream.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::events::MessageQueue;
use crate::http::RequestDescriptor;
use crate::params::ExpectedError;
use crate::subscriptions::EventSource;

static USER_EVENT_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(404, "Application does not exist"),
    ExpectedError::new(422, "Event source not found"),
];

#[derive(Debug)]
pub struct Events {
    inner: Arc<Inner>,
}

impl Events {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Open the event WebSocket for this session's application and return
    /// the pull queue over its events.
    ///
    /// With `subscribe_all` the server delivers events from all resources,
    /// not only subscribed ones. Fails with `AlreadyConnected` while a
    /// previous stream is still live.
    pub fn stream(&self, subscribe_all: bool) -> Result<MessageQueue> {
        self.inner.open_event_stream(subscribe_all)
    }

    /// Generate a custom user event, optionally attached to an event
    /// source.
    pub async fn user_event(&self, event_name: &str, source: Option<&EventSource>) -> Result<()> {
        let source_param = source.map(ToString::to_string).unwrap_or_default();
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/events/user/{event_name}"))
                    .query("application", self.inner.app_name())
                    .query("source", source_param)
                    .expect_errors(USER_EVENT_ERRORS),
            )
            .await?;
        Ok(())
    }
}
