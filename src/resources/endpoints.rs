//! Endpoint operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Endpoint;
use crate::params::ExpectedError;

static GET_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Invalid parameters for sending a message"),
    ExpectedError::new(404, "Endpoints not found"),
];

pub struct Endpoints {
    inner: Arc<Inner>,
}

impl Endpoints {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Result<Vec<Endpoint>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/endpoints"))
            .await?
            .json()
    }

    /// Endpoints of a single channel technology (`PJSIP`, `IAX2`, ...).
    pub async fn list_by_tech(&self, tech: &str) -> Result<Vec<Endpoint>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/endpoints/{tech}")).expect_errors(GET_ERRORS))
            .await?
            .json()
    }

    pub async fn get(&self, tech: &str, resource: &str) -> Result<Endpoint> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::get(format!("/endpoints/{tech}/{resource}"))
                    .expect_errors(GET_ERRORS),
            )
            .await?
            .json()
    }
}
