//! Recording operations, live and stored.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::{Payload, RequestDescriptor};
use crate::models::LiveRecording;
use crate::params::ExpectedError;

static STORED_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "Recording not found")];

static LIVE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(404, "Recording not found"),
    ExpectedError::new(409, "Recording not in session"),
];

pub struct Recordings {
    inner: Arc<Inner>,
}

impl Recordings {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Download a stored recording's media file. Binary payload.
    pub async fn stored_file(&self, recording_name: &str) -> Result<Payload> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::get(format!("/recordings/stored/{recording_name}/file"))
                    .expect_errors(STORED_ERRORS),
            )
            .await
    }

    pub async fn delete_stored(&self, recording_name: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::delete(format!("/recordings/stored/{recording_name}"))
                    .expect_errors(STORED_ERRORS),
            )
            .await?;
        Ok(())
    }

    pub async fn get_live(&self, recording_name: &str) -> Result<LiveRecording> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::get(format!("/recordings/live/{recording_name}"))
                    .expect_errors(STORED_ERRORS),
            )
            .await?
            .json()
    }

    /// Stop a live recording and keep it.
    pub async fn stop_live(&self, recording_name: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/recordings/live/{recording_name}/stop"))
                    .expect_errors(LIVE_ERRORS),
            )
            .await?;
        Ok(())
    }
}
