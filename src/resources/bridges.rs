//! Bridge operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Bridge;
use crate::params::ExpectedError;

static GET_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "Bridge not found")];

static CHANNEL_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Channel not found"),
    ExpectedError::new(404, "Bridge not found"),
    ExpectedError::new(409, "Bridge not in Stasis application"),
    ExpectedError::new(422, "Channel not in Stasis application"),
];

pub struct Bridges {
    inner: Arc<Inner>,
}

impl Bridges {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// List all active bridges.
    pub async fn list(&self) -> Result<Vec<Bridge>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/bridges"))
            .await?
            .json()
    }

    /// Bridge details.
    pub async fn get(&self, bridge_id: &str) -> Result<Bridge> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/bridges/{bridge_id}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    /// Create a bridge. `bridge_type` is a comma separated type list
    /// (`mixing`, `holding`, `dtmf_events`, `proxy_media`).
    pub async fn create(&self, bridge_type: &str, bridge_id: Option<&str>, name: Option<&str>) -> Result<Bridge> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post("/bridges")
                    .query("type", bridge_type)
                    .query("bridgeId", bridge_id.unwrap_or_default())
                    .query("name", name.unwrap_or_default()),
            )
            .await?
            .json()
    }

    /// Shut down a bridge, releasing its channels.
    pub async fn destroy(&self, bridge_id: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(RequestDescriptor::delete(format!("/bridges/{bridge_id}")).expect_errors(GET_ERRORS))
            .await?;
        Ok(())
    }

    /// Add a channel to a bridge.
    pub async fn add_channel(&self, bridge_id: &str, channel_id: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/bridges/{bridge_id}/addChannel"))
                    .query("channel", channel_id)
                    .expect_errors(CHANNEL_ERRORS),
            )
            .await?;
        Ok(())
    }

    /// Remove a channel from a bridge.
    pub async fn remove_channel(&self, bridge_id: &str, channel_id: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/bridges/{bridge_id}/removeChannel"))
                    .query("channel", channel_id)
                    .expect_errors(CHANNEL_ERRORS),
            )
            .await?;
        Ok(())
    }
}
