//! Mailbox operations. Available from ARI 1.0.0 on.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Mailbox;
use crate::params::ExpectedError;

static GET_ERRORS: &[ExpectedError] = &[ExpectedError::new(404, "Mailbox not found")];

#[derive(Debug)]
pub struct Mailboxes {
    inner: Arc<Inner>,
}

impl Mailboxes {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Result<Vec<Mailbox>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/mailboxes"))
            .await?
            .json()
    }

    pub async fn get(&self, name: &str) -> Result<Mailbox> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/mailboxes/{name}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    /// Update the message counts of a mailbox.
    pub async fn update(&self, name: &str, old_messages: i64, new_messages: i64) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::put(format!("/mailboxes/{name}"))
                    .query("oldMessages", old_messages.to_string())
                    .query("newMessages", new_messages.to_string())
                    .expect_errors(GET_ERRORS),
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(RequestDescriptor::delete(format!("/mailboxes/{name}")).expect_errors(GET_ERRORS))
            .await?;
        Ok(())
    }
}
