//! Sound catalog operations.

use std::sync::Arc;

use crate::Result;
use crate::client::Inner;
use crate::http::RequestDescriptor;
use crate::models::Sound;

pub struct Sounds {
    inner: Arc<Inner>,
}

impl Sounds {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// List installed sounds, optionally filtered by language.
    pub async fn list(&self, lang: Option<&str>) -> Result<Vec<Sound>> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get("/sounds").query("lang", lang.unwrap_or_default()))
            .await?
            .json()
    }

    pub async fn get(&self, sound_id: &str) -> Result<Sound> {
        self.inner
            .transport()
            .execute(RequestDescriptor::get(format!("/sounds/{sound_id}")))
            .await?
            .json()
    }
}
