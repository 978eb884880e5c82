//! Plain record types returned by ARI resources.
//!
//! These are structured values only; all behavior lives in the resource
//! clients and the transport. Unknown fields are ignored so newer server
//! revisions stay readable.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Stasis application and its current subscription sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub channel_ids: Vec<String>,
    #[serde(default)]
    pub bridge_ids: Vec<String>,
    #[serde(default)]
    pub endpoint_ids: Vec<String>,
    #[serde(default)]
    pub device_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub caller: Option<CallerId>,
    #[serde(default)]
    pub dialplan: Option<DialplanCep>,
    #[serde(default)]
    pub creationtime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallerId {
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DialplanCep {
    pub context: String,
    pub exten: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bridge {
    pub id: String,
    #[serde(default)]
    pub technology: String,
    pub bridge_type: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub technology: String,
    pub resource: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub channel_ids: Vec<String>,
}

/// Asterisk system information, `GET /asterisk/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct AsteriskInfo {
    #[serde(default)]
    pub build: Option<BuildInfo>,
    #[serde(default)]
    pub system: Option<SystemInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    pub os: String,
    pub kernel: String,
    pub machine: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemInfo {
    pub version: String,
    pub entity_id: String,
}

/// A global or channel variable value.
#[derive(Debug, Clone, Deserialize)]
pub struct Variable {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playback {
    pub id: String,
    pub media_uri: String,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveRecording {
    pub name: String,
    pub format: String,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mailbox {
    pub name: String,
    pub old_messages: i64,
    pub new_messages: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceState {
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sound {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_defaults_missing_sets_to_empty() {
        let app: Application = serde_json::from_str(r#"{"name":"myapp"}"#).expect("valid json");
        assert_eq!(app.name, "myapp");
        assert!(app.channel_ids.is_empty(), "missing set defaults empty");
        assert!(app.device_names.is_empty(), "missing set defaults empty");
    }

    #[test]
    fn channel_parses_server_shape() {
        let json = r#"{
            "id": "1735000000.17",
            "name": "PJSIP/alice-00000011",
            "state": "Up",
            "caller": { "name": "Alice", "number": "1001" },
            "dialplan": { "context": "default", "exten": "s", "priority": 1 },
            "creationtime": "2025-08-01T10:15:30.000Z",
            "language": "en"
        }"#;
        let channel: Channel = serde_json::from_str(json).expect("valid json");
        assert_eq!(channel.id, "1735000000.17");
        assert_eq!(
            channel.caller.expect("caller present").number,
            "1001"
        );
    }
}
