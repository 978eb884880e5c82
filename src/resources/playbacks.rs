//! Playback control operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Playback;
use crate::params::ExpectedError;

static GET_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "The playback cannot be found")];

static CONTROL_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "The provided operation parameter was invalid"),
    ExpectedError::new(404, "The playback cannot be found"),
    ExpectedError::new(409, "The operation cannot be performed in the playback's current state"),
];

pub struct Playbacks {
    inner: Arc<Inner>,
}

impl Playbacks {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub async fn get(&self, playback_id: &str) -> Result<Playback> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/playbacks/{playback_id}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    /// Stop a playback.
    pub async fn stop(&self, playback_id: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(RequestDescriptor::delete(format!("/playbacks/{playback_id}")).expect_errors(GET_ERRORS))
            .await?;
        Ok(())
    }

    /// Control a playback: `restart`, `pause`, `unpause`, `reverse`,
    /// `forward`.
    pub async fn control(&self, playback_id: &str, operation: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/playbacks/{playback_id}/control"))
                    .query("operation", operation)
                    .expect_errors(CONTROL_ERRORS),
            )
            .await?;
        Ok(())
    }
}
