//! REST execution path.
//!
//! One [`HttpTransport`] is shared by every resource client a session hands
//! out. Each call is described by a [`RequestDescriptor`], executed against
//! `<base>/ari/<path>` with the credential pair embedded as an `api_key`
//! query parameter — the wire format the server requires, credentials are
//! not sent as a header here. Responses are classified through the
//! per-call expected-error table.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::{Client as ReqwestClient, Method, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::Result;
use crate::error::{Error, Kind, RestError};
use crate::params::{ExpectedError, Param, encode_body};

/// Status codes the protocol treats as success for every operation.
const OK_CODES: [u16; 4] = [200, 201, 202, 204];

/// Immutable description of one REST call. Built by a resource client,
/// consumed by the transport for exactly one execution.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    path: String,
    method: Method,
    query: Vec<Param>,
    body: Vec<Param>,
    errors: &'static [ExpectedError],
}

impl RequestDescriptor {
    #[must_use]
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: Vec::new(),
            errors: &[],
        }
    }

    #[must_use]
    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post<P: Into<String>>(path: P) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put<P: Into<String>>(path: P) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete<P: Into<String>>(path: P) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter. Parameters with empty values are dropped
    /// at URL build time, matching the wire behavior of the protocol.
    #[must_use]
    pub fn query<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.query.push(Param::new(name, value));
        self
    }

    /// Append a body parameter. See [`encode_body`] for the dual-shape
    /// encoding selected by the first parameter.
    #[must_use]
    pub fn body_param<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.body.push(Param::new(name, value));
        self
    }

    /// Attach the table of expected status codes for this call site.
    #[must_use]
    pub fn expect_errors(mut self, errors: &'static [ExpectedError]) -> Self {
        self.errors = errors;
        self
    }
}

/// A decoded success payload, text or binary.
#[derive(Debug, Clone)]
pub struct Payload {
    status: StatusCode,
    body: Vec<u8>,
}

impl Payload {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Shared REST transport. One underlying connection per call, no pooling
/// guarantees; reqwest releases the connection whether the call succeeds,
/// fails or is dropped mid-flight.
#[derive(Debug)]
pub struct HttpTransport {
    base: Url,
    username: String,
    password: SecretString,
    client: ReqwestClient,
    closed: AtomicBool,
}

impl HttpTransport {
    pub fn new(base: Url, username: String, password: SecretString) -> Result<Self> {
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::configuration(format!(
                    "unsupported scheme {other}, expected http or https"
                )));
            }
        }

        let client = ReqwestClient::builder().build()?;
        Ok(Self {
            base,
            username,
            password,
            client,
            closed: AtomicBool::new(false),
        })
    }

    /// Mark the transport torn down. Calls observing the flag fail with
    /// [`Kind::ClientShutdown`] instead of a misleading network error.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn urlencode(value: &str) -> String {
        byte_serialize(value.as_bytes()).collect()
    }

    /// Build `<base>/ari/<path>?api_key=<user>:<pass>&...`.
    ///
    /// The credential pair keeps its literal `:` separator with each half
    /// encoded separately; query parameters with empty values are skipped.
    fn build_url(&self, path: &str, query: &[Param]) -> Result<Url> {
        let mut url = self.base.clone();
        let base_path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{base_path}/ari{path}"));

        let mut qs = format!(
            "api_key={}:{}",
            Self::urlencode(&self.username),
            Self::urlencode(self.password.expose_secret()),
        );
        for param in query {
            if param.value.is_empty() {
                continue;
            }
            qs.push('&');
            qs.push_str(&param.name);
            qs.push('=');
            qs.push_str(&Self::urlencode(&param.value));
        }
        url.set_query(Some(&qs));
        Ok(url)
    }

    /// Build the WebSocket endpoint URL: same base with the scheme swapped
    /// (`http` → `ws`, `https` → `wss`).
    pub(crate) fn build_ws_url(&self, path: &str, query: &[Param]) -> Result<Url> {
        let mut url = self.build_url(path, query)?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|()| Error::configuration("cannot swap scheme for websocket url"))?;
        Ok(url)
    }

    /// Execute one REST call and classify the outcome.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Payload> {
        if self.is_closed() {
            return Err(Error::shutdown());
        }

        let url = self.build_url(&descriptor.path, &descriptor.query)?;
        tracing::debug!(method = %descriptor.method, path = %descriptor.path, "rest call");

        let mut request = self.client.request(descriptor.method.clone(), url);
        if let Some(body) = encode_body(&descriptor.body) {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                // A drop caused by teardown is reported distinctly, never
                // as a network error.
                if self.is_closed() {
                    return Err(Error::shutdown());
                }
                if e.is_connect() || e.is_timeout() {
                    return Err(Error::with_source(Kind::Connection, e));
                }
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if OK_CODES.contains(&status.as_u16()) {
            return Ok(Payload { status, body });
        }

        let description = descriptor
            .errors
            .iter()
            .find(|e| e.code == status.as_u16())
            .map(|e| e.description.to_owned());

        tracing::warn!(
            status = status.as_u16(),
            method = %descriptor.method,
            path = %descriptor.path,
            "rest call failed"
        );

        Err(RestError {
            status_code: status.as_u16(),
            description,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
        .into())
    }
}
