//! Device state operations. Available from ARI 1.0.0 on.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::DeviceState;
use crate::params::ExpectedError;

static UPDATE_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(404, "Device name is missing"),
    ExpectedError::new(409, "Uncontrolled device specified"),
];

#[derive(Debug)]
pub struct DeviceStates {
    inner: Arc<Inner>,
}

impl DeviceStates {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Result<Vec<DeviceState>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/deviceStates"))
            .await?
            .json()
    }

    pub async fn get(&self, device_name: &str) -> Result<DeviceState> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/deviceStates/{device_name}")))
            .await?
            .json()
    }

    /// Change the state of a controlled device
    /// (`NOT_INUSE`, `INUSE`, `BUSY`, ...).
    pub async fn update(&self, device_name: &str, state: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::put(format!("/deviceStates/{device_name}"))
                    .query("deviceState", state)
                    .expect_errors(UPDATE_ERRORS),
            )
            .await?;
        Ok(())
    }

    /// Destroy a controlled device state.
    pub async fn delete(&self, device_name: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::delete(format!("/deviceStates/{device_name}"))
                    .expect_errors(UPDATE_ERRORS),
            )
            .await?;
        Ok(())
    }
}
