//! The ARI session.
//!
//! An [`Ari`] owns one HTTP transport and at most one live event
//! WebSocket, resolves resource clients through the active dialect's
//! capability table, and unwinds everything on [`Ari::close`]:
//! unsubscribe-all, close tracked streams, close the WebSocket, close the
//! transport. After that every call fails with `ClientShutdown`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bon::Builder;
use dashmap::DashMap;
use rand::Rng as _;
use regex::Regex;
use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::Result;
use crate::error::{Error, RestError, UnsupportedVersion};
use crate::events::{MessageQueue, queue_pair};
use crate::http::HttpTransport;
use crate::models::Application;
use crate::params::Param;
use crate::resources::{
    applications::Applications, asterisk::Asterisk, bridges::Bridges, channels::Channels,
    device_states::DeviceStates, endpoints::Endpoints, events::Events, mailboxes::Mailboxes,
    playbacks::Playbacks, recordings::Recordings, sounds::Sounds,
};
use crate::subscriptions::{EventSource, Subscriber};
use crate::version::{AriVersion, Capability};
use crate::ws::{ConnectionState, EventConnection, WsConfig};

/// Introspection document used for version auto-detection.
const RESOURCES_JSON: &str = "ari/api-docs/resources.json";

static API_VERSION_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"(?im)"apiVersion"\s*:\s*"(.+?)""#).expect("pattern is a verified literal")
});

/// Alphabet for [`Ari::unique_id`].
const UID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Connection settings for a session.
///
/// Leave `version` unset to auto-detect the server's dialect with one
/// bootstrap REST call.
#[derive(Debug, Clone, Builder)]
pub struct AriConfig {
    /// Base address of the Asterisk HTTP server, e.g. `http://pbx:8088/`
    #[builder(into)]
    pub url: String,
    /// Stasis application name
    #[builder(into)]
    pub app: String,
    #[builder(into)]
    pub username: String,
    #[builder(into)]
    pub password: String,
    /// Dialect to speak; `None` auto-detects
    pub version: Option<AriVersion>,
    /// WebSocket session tuning; defaults implement the protocol policy
    pub ws: Option<WsConfig>,
}

/// Session state shared between the root handle and the resource clients
/// it hands out.
#[derive(Debug)]
pub(crate) struct Inner {
    transport: HttpTransport,
    app_name: String,
    version: AriVersion,
    ws_config: WsConfig,
    /// The one live event stream, if any. Requesting a second while one
    /// is open is an error.
    live_events: Mutex<Option<EventConnection>>,
    /// Every streaming operation opened through this session, for
    /// coordinated teardown.
    open_streams: DashMap<u64, EventConnection>,
    next_stream: AtomicU64,
    subscriber: Subscriber,
}

impl Inner {
    pub(crate) fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub(crate) fn app_name(&self) -> &str {
        &self.app_name
    }

    pub(crate) fn open_event_stream(&self, subscribe_all: bool) -> Result<MessageQueue> {
        if self.transport.is_closed() {
            return Err(Error::shutdown());
        }

        let mut live = self
            .live_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(conn) = live.as_ref()
            && !conn.is_disconnected()
            && !conn.state().is_terminal()
        {
            return Err(Error::already_connected());
        }

        let mut query = vec![Param::new("app", self.app_name.clone())];
        if subscribe_all {
            query.push(Param::new("subscribeAll", "true"));
        }
        let url = self.transport.build_ws_url("/events", &query)?;

        let (tx, queue) = queue_pair();
        let conn = EventConnection::open(url, self.ws_config.clone(), tx)?;

        // Streams that already terminated need no teardown anymore.
        self.open_streams
            .retain(|_, conn| !conn.is_disconnected() && !conn.state().is_terminal());

        let id = self.next_stream.fetch_add(1, Ordering::Relaxed);
        self.open_streams.insert(id, conn.clone());
        *live = Some(conn);
        Ok(queue)
    }
}

/// Root handle for one ARI session.
#[derive(Debug)]
pub struct Ari {
    inner: Arc<Inner>,
}

impl Ari {
    /// Build a session. With no explicit version this issues one
    /// synchronous bootstrap call to the server's introspection endpoint
    /// and maps the reported `apiVersion` to a dialect; detection failure
    /// aborts construction entirely.
    pub async fn build(config: AriConfig) -> Result<Ari> {
        let base = Url::parse(&config.url)?;
        let password = SecretString::from(config.password);

        let version = match config.version {
            Some(version) => version,
            None => Self::detect_version(&base, &config.username, &password).await?,
        };

        let transport = HttpTransport::new(base, config.username, password)?;
        tracing::info!(%version, app = %config.app, "ari session ready");

        Ok(Ari {
            inner: Arc::new(Inner {
                transport,
                app_name: config.app,
                version,
                ws_config: config.ws.unwrap_or_default(),
                live_events: Mutex::new(None),
                open_streams: DashMap::new(),
                next_stream: AtomicU64::new(0),
                subscriber: Subscriber::default(),
            }),
        })
    }

    /// Fetch `resources.json` and extract the version marker.
    ///
    /// This is the one REST call that authenticates with an HTTP Basic
    /// header instead of the `api_key` query pair: it runs before a
    /// dialect is selected.
    async fn detect_version(
        base: &Url,
        username: &str,
        password: &SecretString,
    ) -> Result<AriVersion> {
        let url = Self::resources_url(base);
        let response = reqwest::Client::new()
            .get(url)
            .basic_auth(username, Some(password.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RestError {
                status_code: status.as_u16(),
                description: None,
                body,
            }
            .into());
        }

        let version = API_VERSION_PATTERN
            .captures(&body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::from(UnsupportedVersion { version: None }))?;

        AriVersion::from_version_string(version)
    }

    /// Bootstrap URL for the introspection document, using the same
    /// trim-and-append path rule as the transport so a base address with a
    /// path prefix resolves identically on both paths.
    fn resources_url(base: &Url) -> Url {
        let mut url = base.clone();
        let base_path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{base_path}/{RESOURCES_JSON}"));
        url
    }

    /// The dialect this session speaks.
    #[must_use]
    pub fn version(&self) -> AriVersion {
        self.inner.version
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        self.inner.app_name()
    }

    /// State of the live event stream, if one was opened.
    #[must_use]
    pub fn event_stream_state(&self) -> Option<ConnectionState> {
        self.inner
            .live_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(EventConnection::state)
    }

    fn resolve(&self, capability: Capability) -> Result<Arc<Inner>> {
        if self.inner.transport.is_closed() {
            return Err(Error::shutdown());
        }
        self.inner.version.resolve(capability)?;
        Ok(Arc::clone(&self.inner))
    }

    pub fn applications(&self) -> Result<Applications> {
        self.resolve(Capability::Applications).map(Applications::new)
    }

    pub fn asterisk(&self) -> Result<Asterisk> {
        self.resolve(Capability::Asterisk).map(Asterisk::new)
    }

    pub fn bridges(&self) -> Result<Bridges> {
        self.resolve(Capability::Bridges).map(Bridges::new)
    }

    pub fn channels(&self) -> Result<Channels> {
        self.resolve(Capability::Channels).map(Channels::new)
    }

    pub fn device_states(&self) -> Result<DeviceStates> {
        self.resolve(Capability::DeviceStates).map(DeviceStates::new)
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        self.resolve(Capability::Endpoints).map(Endpoints::new)
    }

    pub fn events(&self) -> Result<Events> {
        self.resolve(Capability::Events).map(Events::new)
    }

    pub fn mailboxes(&self) -> Result<Mailboxes> {
        self.resolve(Capability::Mailboxes).map(Mailboxes::new)
    }

    pub fn playbacks(&self) -> Result<Playbacks> {
        self.resolve(Capability::Playbacks).map(Playbacks::new)
    }

    pub fn recordings(&self) -> Result<Recordings> {
        self.resolve(Capability::Recordings).map(Recordings::new)
    }

    pub fn sounds(&self) -> Result<Sounds> {
        self.resolve(Capability::Sounds).map(Sounds::new)
    }

    /// Subscribe this session's application to an event source.
    /// Idempotent per identifier.
    pub async fn subscribe(&self, source: &EventSource) -> Result<Application> {
        let api = self.applications()?;
        self.inner
            .subscriber
            .subscribe(&api, self.app_name(), source)
            .await
    }

    /// Unsubscribe this session's application from an event source.
    pub async fn unsubscribe(&self, source: &EventSource) -> Result<()> {
        let api = self.applications()?;
        self.inner
            .subscriber
            .unsubscribe(&api, self.app_name(), source)
            .await
    }

    /// Unsubscribe from everything the server currently tracks for this
    /// application, including subscriptions made outside this client.
    pub async fn unsubscribe_all(&self) -> Result<()> {
        let api = self.applications()?;
        self.inner
            .subscriber
            .unsubscribe_all(&api, self.app_name())
            .await
    }

    /// Close the live event stream, if any, without tearing down the rest
    /// of the session.
    pub fn close_event_stream(&self) {
        if let Some(conn) = self
            .inner
            .live_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            conn.disconnect();
        }
    }

    /// Tear the session down: unsubscribe everything (best-effort), close
    /// every tracked streaming operation, close the WebSocket, close the
    /// transport. The session is unusable afterwards.
    pub async fn close(&self) {
        if let Err(e) = self.unsubscribe_all().await {
            tracing::debug!(error = %e, "unsubscribe-all failed during teardown");
        }

        for entry in &self.inner.open_streams {
            entry.value().disconnect();
        }
        self.inner.open_streams.clear();

        if let Some(conn) = self
            .inner
            .live_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            conn.disconnect();
        }

        self.inner.transport.close();
    }

    /// Generate a pseudo-random id shaped like `a4rs.ZH6IA.IXEX0.TUIE8`,
    /// usable for channel or bridge ids.
    #[must_use]
    pub fn unique_id() -> String {
        let mut rng = rand::rng();
        let mut id = String::with_capacity(20);
        id.push_str("a4rs");
        for n in 0..15 {
            if n % 5 == 0 {
                id.push('.');
            }
            let pos = rng.random_range(0..UID_ALPHABET.len());
            id.push(UID_ALPHABET[pos] as char);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_id_shape() {
        let id = Ari::unique_id();
        assert_eq!(id.len(), 22, "a4rs plus three dotted groups of five");
        let parts: Vec<&str> = id.split('.').collect();
        assert_eq!(parts[0], "a4rs");
        assert_eq!(parts.len(), 4);
        for part in &parts[1..] {
            assert_eq!(part.len(), 5);
            assert!(
                part.bytes().all(|b| UID_ALPHABET.contains(&b)),
                "unexpected character in {part}"
            );
        }
    }

    #[test]
    fn version_pattern_matches_introspection_document() {
        let body = "{\n  \"basePath\": \"http://pbx:8088/ari\",\n  \"APIVERSION\": \"2.0.0\"\n}";
        let captured = API_VERSION_PATTERN
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        assert_eq!(captured, Some("2.0.0"), "match is case-insensitive");
    }

    #[test]
    fn version_pattern_rejects_absent_marker() {
        assert!(
            API_VERSION_PATTERN.captures("{\"basePath\": \"x\"}").is_none(),
            "no marker means no match"
        );
    }

    #[test]
    fn resources_url_preserves_base_path_prefix() {
        let base = Url::parse("http://pbx:8088/asterisk").expect("valid url");
        assert_eq!(
            Ari::resources_url(&base).path(),
            "/asterisk/ari/api-docs/resources.json"
        );

        let base = Url::parse("http://pbx:8088/").expect("valid url");
        assert_eq!(
            Ari::resources_url(&base).path(),
            "/ari/api-docs/resources.json"
        );
    }

    #[tokio::test]
    async fn reopened_streams_do_not_accumulate() {
        use std::time::Duration;

        // Nothing listens on the discard port; every stream fails fast and
        // becomes reopenable.
        let ari = Ari::build(
            AriConfig::builder()
                .url("http://127.0.0.1:9/")
                .app("myapp")
                .username("u")
                .password("p")
                .version(AriVersion::V6_0_0)
                .ws(WsConfig {
                    reconnect_schedule: vec![Duration::from_millis(1)],
                    max_reconnect_attempts: 0,
                    ..WsConfig::default()
                })
                .build(),
        )
        .await
        .expect("pinned version needs no bootstrap call");

        for _ in 0..3 {
            let mut queue = ari
                .inner
                .open_event_stream(false)
                .expect("previous stream is terminal");
            while queue.recv().await.is_some() {}
        }

        assert_eq!(
            ari.inner.open_streams.len(),
            1,
            "terminated streams are evicted on reopen"
        );
    }
}
