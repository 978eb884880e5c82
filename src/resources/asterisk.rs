//! Asterisk system operations: info, global variables, dynamic config.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::{AsteriskInfo, Variable};
use crate::params::ExpectedError;

static VARIABLE_ERRORS: &[ExpectedError] = &[ExpectedError::new(400, "Missing variable parameter")];

static CONFIG_ERRORS: &[ExpectedError] = &[
    ExpectedError::new(400, "Bad request body"),
    ExpectedError::new(403, "Could not create or update object"),
    ExpectedError::new(404, "Configuration class or object type does not exist"),
];

pub struct Asterisk {
    inner: Arc<Inner>,
}

impl Asterisk {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// System information: build, system, config and status blocks.
    pub async fn info(&self) -> Result<AsteriskInfo> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/asterisk/info"))
            .await?
            .json()
    }

    /// Read a global dialplan variable.
    pub async fn global_variable(&self, variable: &str) -> Result<Variable> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::get("/asterisk/variable")
                    .query("variable", variable)
                    .expect_errors(VARIABLE_ERRORS),
            )
            .await?
            .json()
    }

    /// Set a global dialplan variable.
    pub async fn set_global_variable(&self, variable: &str, value: &str) -> Result<()> {
        self.inner
            .transport()
            .execute(
                RequestDescriptor::post("/asterisk/variable")
                    .query("variable", variable)
                    .query("value", value)
                    .expect_errors(VARIABLE_ERRORS),
            )
            .await?;
        Ok(())
    }

    /// Create or update a dynamic configuration object. `fields` become the
    /// `{"fields":[{"attribute":..,"value":..},..]}` request body.
    pub async fn update_config_object(
        &self,
        config_class: &str,
        object_type: &str,
        id: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        let mut descriptor = RequestDescriptor::put(format!(
            "/asterisk/config/dynamic/{config_class}/{object_type}/{id}"
        ))
        .body_param("fields", "")
        .expect_errors(CONFIG_ERRORS);
        for (attribute, value) in fields {
            descriptor = descriptor.body_param(attribute.clone(), value.clone());
        }

        self.inner.transport().execute(descriptor).await?;
        Ok(())
    }
}
