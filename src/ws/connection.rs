use std::time::Instant;

use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{interval, sleep};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::config::WsConfig;
use super::error::WsError;
use crate::Result;
use crate::events::{AriEvent, QueueSender};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Keepalive ping payload; the server echoes it back in the pong.
const PING_PAYLOAD: &[u8] = b"a4rs";

/// Connection lifecycle states.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial state, before the first connect attempt
    Disconnected,
    /// Transport connect plus protocol handshake in flight
    Connecting,
    /// Handshake succeeded, events flowing
    Connected {
        /// When the handshake completed
        since: Instant,
    },
    /// Waiting out the backoff delay before the numbered attempt
    Reconnecting {
        /// Value of the reconnect counter for the scheduled attempt
        attempt: u32,
    },
    /// Terminal: closed by an explicit disconnect
    Closed,
    /// Terminal: reconnection exhausted its attempt ceiling
    Failed,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

/// Why the pump loop returned control to the connection loop.
enum PumpExit {
    /// Explicit disconnect observed; no reconnect may follow.
    Cancelled,
    /// The connection dropped unexpectedly.
    Dropped(String),
}

/// Handle to one live event-stream connection.
///
/// The socket itself is owned by a background task; this handle only
/// observes state and signals shutdown. Dropping the handle does not close
/// the stream — teardown is explicit.
#[derive(Debug, Clone)]
pub struct EventConnection {
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
}

impl EventConnection {
    /// Spawn the connection task and return its handle.
    ///
    /// Connecting is asynchronous: handshake failures feed the reconnect
    /// policy and, once exhausted, surface as the queue's terminal error
    /// marker rather than an error here.
    pub(crate) fn open(url: Url, config: WsConfig, queue: QueueSender) -> Result<Self> {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            Self::connection_loop(url, config, queue, state_tx, task_cancel).await;
        });

        Ok(Self { state_rx, cancel })
    }

    /// Current state of the connection machine.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch state transitions, useful for waiting on `Connected`.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Graceful teardown. The shutdown flag is raised before the socket
    /// closes, so the resulting drop is never misread as a failure that
    /// needs a reconnect.
    pub fn disconnect(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub(crate) fn is_disconnected(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Outer loop: connect, pump, and reschedule per the backoff policy.
    async fn connection_loop(
        url: Url,
        config: WsConfig,
        queue: QueueSender,
        state_tx: watch::Sender<ConnectionState>,
        cancel: CancellationToken,
    ) {
        let mut attempt = 0_u32;
        let mut cause = String::new();

        loop {
            if cancel.is_cancelled() {
                let _ = state_tx.send(ConnectionState::Closed);
                return;
            }

            let _ = state_tx.send(ConnectionState::Connecting);

            let connected = tokio::select! {
                () = cancel.cancelled() => {
                    let _ = state_tx.send(ConnectionState::Closed);
                    return;
                }
                result = connect_async(url.as_str()) => result,
            };

            match connected {
                Ok((stream, _response)) => {
                    // Counter resets on every successful handshake.
                    attempt = 0;
                    let _ = state_tx.send(ConnectionState::Connected {
                        since: Instant::now(),
                    });
                    tracing::info!("event websocket connected");

                    match Self::pump(stream, &queue, &config, &cancel).await {
                        PumpExit::Cancelled => {
                            let _ = state_tx.send(ConnectionState::Closed);
                            return;
                        }
                        PumpExit::Dropped(reason) => {
                            tracing::warn!(%reason, "event websocket dropped");
                            cause = reason;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "event websocket connect failed");
                    cause = e.to_string();
                }
            }

            // An explicit disconnect racing the drop wins: no reconnect.
            if cancel.is_cancelled() {
                let _ = state_tx.send(ConnectionState::Closed);
                return;
            }

            if attempt >= config.max_reconnect_attempts {
                let _ = state_tx.send(ConnectionState::Failed);
                queue.enqueue_error(
                    WsError::ReconnectExhausted {
                        attempts: attempt,
                        cause: cause.clone(),
                    }
                    .to_string(),
                );
                return;
            }

            let delay = config.reconnect_delay(attempt);
            attempt = attempt.saturating_add(1);
            let _ = state_tx.send(ConnectionState::Reconnecting { attempt });
            tracing::debug!(attempt, ?delay, "scheduling websocket reconnect");

            tokio::select! {
                () = cancel.cancelled() => {
                    let _ = state_tx.send(ConnectionState::Closed);
                    return;
                }
                () = sleep(delay) => {}
            }
        }
    }

    /// Drive one live socket: decode inbound frames in order, keep the
    /// connection alive, observe the shutdown signal. The task is the only
    /// writer on the socket.
    async fn pump(
        stream: WsStream,
        queue: &QueueSender,
        config: &WsConfig,
        cancel: &CancellationToken,
    ) -> PumpExit {
        let (mut write, mut read) = stream.split();
        let mut keepalive = interval(config.keepalive_interval);
        keepalive.reset();
        let mut last_inbound = Instant::now();

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    // Best effort close frame; the server may already be gone.
                    let _ = write.send(Message::Close(None)).await;
                    return PumpExit::Cancelled;
                }

                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            last_inbound = Instant::now();
                            match serde_json::from_str::<AriEvent>(&text) {
                                Ok(event) => {
                                    if !queue.enqueue(event) {
                                        tracing::debug!("event consumer dropped, keeping socket alive");
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, %text, "undecodable event frame");
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            return PumpExit::Dropped(WsError::ConnectionClosed.to_string());
                        }
                        Some(Ok(_)) => {
                            // Pongs and binary frames count as liveness only.
                            last_inbound = Instant::now();
                        }
                        Some(Err(e)) => {
                            return PumpExit::Dropped(e.to_string());
                        }
                        None => {
                            return PumpExit::Dropped(WsError::ConnectionClosed.to_string());
                        }
                    }
                }

                _ = keepalive.tick() => {
                    if last_inbound.elapsed() > config.idle_threshold
                        && write.send(Message::Ping(PING_PAYLOAD.to_vec())).await.is_err()
                    {
                        return PumpExit::Dropped(WsError::ConnectionClosed.to_string());
                    }
                }
            }
        }
    }
}
