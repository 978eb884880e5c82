use std::time::Duration;

/// Backoff schedule for reconnect attempts, indexed by the attempt counter
/// and clamped at the last entry.
const DEFAULT_RECONNECT_SCHEDULE: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Reconnect attempts before the connection goes terminally failed.
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(15);

/// Configuration for the WebSocket session.
///
/// The defaults implement the protocol's fixed policy; tests shrink the
/// durations to keep runs fast.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// How often the keepalive timer fires while connected.
    pub keepalive_interval: Duration,
    /// Idle time since the last inbound frame before a ping is sent. A
    /// liveness probe only; no pong bookkeeping beyond the transport's own
    /// drop detection.
    pub idle_threshold: Duration,
    /// Backoff delays by attempt index, clamped at the last entry.
    pub reconnect_schedule: Vec<Duration>,
    /// Ceiling on scheduled reconnect attempts.
    pub max_reconnect_attempts: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            reconnect_schedule: DEFAULT_RECONNECT_SCHEDULE.to_vec(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl WsConfig {
    /// Delay before the reconnect attempt with the given counter value.
    #[must_use]
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        match self.reconnect_schedule.as_slice() {
            [] => Duration::ZERO,
            schedule => {
                let idx = (attempt as usize).min(schedule.len() - 1);
                schedule[idx]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_two_five_ten_clamped() {
        let config = WsConfig::default();
        let expected = [2, 5, 10, 10, 10, 10];
        for (attempt, secs) in expected.into_iter().enumerate() {
            assert_eq!(
                config.reconnect_delay(u32::try_from(attempt).expect("small index")),
                Duration::from_secs(secs),
                "attempt {attempt}"
            );
        }
    }

    #[test]
    fn ceiling_is_ten_attempts() {
        assert_eq!(WsConfig::default().max_reconnect_attempts, 10);
    }

    #[test]
    fn empty_schedule_means_no_delay() {
        let config = WsConfig {
            reconnect_schedule: Vec::new(),
            ..WsConfig::default()
        };
        assert_eq!(config.reconnect_delay(3), Duration::ZERO);
    }
}
