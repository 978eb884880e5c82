use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;

use crate::version::{AriVersion, Capability};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Malformed address, missing protocol version or other bad client setup
    Configuration,
    /// Auto-detection found a server version this crate has no dialect for
    UnsupportedVersion,
    /// The active dialect has no implementation for the requested capability
    NotSupported,
    /// Classified non-2xx HTTP response
    Rest,
    /// A call observed a transport that was already torn down
    ClientShutdown,
    /// Transport-level connect or handshake failure, possibly after
    /// exhausting reconnect attempts
    Connection,
    /// A second event stream was opened while one is live
    AlreadyConnected,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn bare(kind: Kind) -> Self {
        Self {
            kind,
            source: None,
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn configuration<S: Into<String>>(reason: S) -> Self {
        Configuration {
            reason: reason.into(),
        }
        .into()
    }

    pub fn shutdown() -> Self {
        Self::bare(Kind::ClientShutdown)
    }

    pub fn already_connected() -> Self {
        Self::bare(Kind::AlreadyConnected)
    }

    pub fn connection<S: Into<String>>(reason: S) -> Self {
        ConnectionFailure {
            reason: reason.into(),
        }
        .into()
    }

    /// True when this error carries a classified HTTP failure with the
    /// given status code.
    #[must_use]
    pub fn is_status(&self, code: u16) -> bool {
        self.downcast_ref::<RestError>()
            .is_some_and(|e| e.status_code == code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Classified HTTP failure: status code, description drawn from the
/// per-call expected-error table (when the code was listed there) and the
/// raw response body.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RestError {
    pub status_code: u16,
    pub description: Option<String>,
    pub body: String,
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "{} ({}): {}", desc, self.status_code, self.body),
            None => write!(f, "http {}: {}", self.status_code, self.body),
        }
    }
}

impl StdError for RestError {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Configuration {
    pub reason: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.reason)
    }
}

impl StdError for Configuration {}

/// Raised when version auto-detection matched no known dialect, or the
/// `apiVersion` marker was absent from the introspection document.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct UnsupportedVersion {
    /// The version string reported by the server, when one was found.
    pub version: Option<String>,
}

impl fmt::Display for UnsupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "no dialect for server version {v}"),
            None => write!(f, "could not match apiVersion in server response"),
        }
    }
}

impl StdError for UnsupportedVersion {}

/// Raised when the active dialect has no mapping for a capability. This is
/// expected for version-specific features, not a bug.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct NotSupported {
    pub capability: Capability,
    pub version: AriVersion,
}

impl fmt::Display for NotSupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no {} implementation in dialect {}",
            self.capability, self.version
        )
    }
}

impl StdError for NotSupported {}

#[non_exhaustive]
#[derive(Debug)]
pub struct ConnectionFailure {
    pub reason: String,
}

impl fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection failure: {}", self.reason)
    }
}

impl StdError for ConnectionFailure {}

impl From<RestError> for Error {
    fn from(err: RestError) -> Self {
        Error::with_source(Kind::Rest, err)
    }
}

impl From<Configuration> for Error {
    fn from(err: Configuration) -> Self {
        Error::with_source(Kind::Configuration, err)
    }
}

impl From<UnsupportedVersion> for Error {
    fn from(err: UnsupportedVersion) -> Self {
        Error::with_source(Kind::UnsupportedVersion, err)
    }
}

impl From<NotSupported> for Error {
    fn from(err: NotSupported) -> Self {
        Error::with_source(Kind::NotSupported, err)
    }
}

impl From<ConnectionFailure> for Error {
    fn from(err: ConnectionFailure) -> Self {
        Error::with_source(Kind::Connection, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}
