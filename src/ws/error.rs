use std::error::Error as StdError;
use std::fmt;

/// WebSocket session error variants.
#[non_exhaustive]
#[derive(Debug)]
pub enum WsError {
    /// Error connecting to or communicating with the WebSocket server
    Connection(tokio_tungstenite::tungstenite::Error),
    /// The connection was closed by the peer
    ConnectionClosed,
    /// Reconnection gave up after reaching the attempt ceiling
    ReconnectExhausted {
        attempts: u32,
        /// The failure that triggered the final attempt
        cause: String,
    },
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "websocket connection error: {e}"),
            Self::ConnectionClosed => write!(f, "websocket connection closed"),
            Self::ReconnectExhausted { attempts, cause } => {
                write!(f, "gave up reconnecting after {attempts} attempts: {cause}")
            }
        }
    }
}

impl StdError for WsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Connection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WsError> for crate::error::Error {
    fn from(e: WsError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Connection, e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for crate::error::Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        WsError::Connection(e).into()
    }
}
