//! Channel operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::{Channel, Variable};
use crate::params::ExpectedError;

static GET_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "Channel not found")];

static ORIGINATE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Invalid parameters for originating a channel"),
    ExpectedError::new(409, "Channel with given unique ID already exists"),
];

static HANGUP_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Invalid reason for hangup provided"),
    ExpectedError::new(404, "Channel not found"),
];

static VARIABLE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Missing variable parameter"),
    ExpectedError::new(404, "Channel not found"),
    ExpectedError::new(409, "Channel not in a Stasis application"),
];

pub struct Channels {
    inner: Arc<Inner>,
}

impl Channels {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// List all active channels.
    pub async fn list(&self) -> Result<Vec<Channel>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/channels"))
            .await?
            .json()
    }

    /// Channel details.
    pub async fn get(&self, channel_id: &str) -> Result<Channel> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/channels/{channel_id}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    /// Originate a new channel into this session's application. Dialplan
    /// variables travel in the `{"variables":{..}}` body shape.
    pub async fn originate(
        &self,
        endpoint: &str,
        channel_id: Option<&str>,
        variables: &[(String, String)],
    ) -> Result<Channel> {
        let mut descriptor = RequestDescriptor::post("/channels")
            .query("endpoint", endpoint)
            .query("app", self.inner.app_name())
            .query("channelId", channel_id.unwrap_or_default())
            .expect_errors(ORIGINATE_ERRORS);
        if !variables.is_empty() {
            descriptor = descriptor.body_param("variables", "");
            for (name, value) in variables {
                descriptor = descriptor.body_param(name.clone(), value.clone());
            }
        }

        self.inner.transport().execute(descriptor).await?.json()
    }

    /// Hang up, with an optional reason (`normal`, `busy`, `congestion`,
    /// `no_answer`).
    pub async fn hangup(&self, channel_id: &str, reason: Option<&str>) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::delete(format!("/channels/{channel_id}"))
                    .query("reason", reason.unwrap_or_default())
                    .expect_errors(HANGUP_ERRORS),
            )
            .await?;
        Ok(())
    }

    /// Read a channel variable or function.
    pub async fn variable(&self, channel_id: &str, variable: &str) -> Result<Variable> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::get(format!("/channels/{channel_id}/variable"))
                    .query("variable", variable)
                    .expect_errors(VARIABLE_ERRORS),
            )
            .await?
            .json()
    }

    /// Set a channel variable or function.
    pub async fn set_variable(&self, channel_id: &str, variable: &str, value: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post(format!("/channels/{channel_id}/variable"))
                    .query("variable", variable)
                    .query("value", value)
                    .expect_errors(VARIABLE_ERRORS),
            )
            .await?;
        Ok(())
    }
}
