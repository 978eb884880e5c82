//! Stasis application operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Application;
use crate::params::ExpectedError;
use crate::subscriptions::EventSource;

static GET_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "Application does not exist")];

static SUBSCRIBE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Missing parameter"),
    ExpectedError::new(404, "Application does not exist"),
    ExpectedError::new(422, "Event source does not exist"),
];

static UNSUBSCRIBE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Missing parameter; event source scheme not recognized"),
    ExpectedError::new(404, "Application does not exist"),
    ExpectedError::new(409, "Application not subscribed to event source"),
    ExpectedError::new(422, "Event source does not exist"),
];

#[derive(Debug)]
pub struct Applications {
    inner: Arc<Inner>,
}

impl Applications {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// List all applications registered on the server.
    pub async fn list(&self) -> Result<Vec<Application>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/applications"))
            .await?
            .json()
    }

    /// Get a single application's details, including its current
    /// subscription sets.
    pub async fn get(&self, name: &str) -> Result<Application> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/applications/{name}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    /// Subscribe the application to an event source, returning the
    /// refreshed application record.
    pub async fn subscribe(&self, name: &str, source: &EventSource) -> Result<Application> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/applications/{name}/subscription"))
                    .query("eventSource", source.to_string())
                    .expect_errors(SUBSCRIBE_ERRORS),
            )
            .await?
            .json()
    }

    /// Unsubscribe the application from an event source, returning the
    /// refreshed application record.
    pub async fn unsubscribe(&self, name: &str, source: &EventSource) -> Result<Application> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::delete(format!("/applications/{name}/subscription"))
                    .query("eventSource", source.to_string())
                    .expect_errors(UNSUBSCRIBE_ERRORS),
            )
            .await?
            .json()
    }
}
