//! Subscription registry for the running application.
//!
//! Tracks which event sources the application is subscribed to, one entry
//! per application name. The server remains the authority: local sets are
//! refreshed from every [`Application`](crate::models::Application) record
//! the server returns, and teardown re-fetches the record so subscriptions
//! made outside this client instance are unwound too.

use std::collections::HashSet;
use std::fmt;

use dashmap::DashMap;

use crate::Result;
use crate::models::Application;
use crate::resources::applications::Applications;

/// An identifiable server-side resource that can be subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventSource {
    Channel(String),
    Bridge(String),
    Endpoint(String),
    DeviceState(String),
}

impl EventSource {
    fn id(&self) -> &str {
        match self {
            EventSource::Channel(id)
            | EventSource::Bridge(id)
            | EventSource::Endpoint(id)
            | EventSource::DeviceState(id) => id,
        }
    }
}

impl fmt::Display for EventSource {
    /// Wire form used by the `eventSource` query parameter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Channel(id) => write!(f, "channel:{id}"),
            EventSource::Bridge(id) => write!(f, "bridge:{id}"),
            EventSource::Endpoint(id) => write!(f, "endpoint:{id}"),
            EventSource::DeviceState(name) => write!(f, "deviceState:{name}"),
        }
    }
}

/// The four per-application identifier sets.
#[derive(Debug, Default)]
struct SubscriptionSets {
    channels: HashSet<String>,
    bridges: HashSet<String>,
    endpoints: HashSet<String>,
    device_states: HashSet<String>,
}

impl SubscriptionSets {
    fn set_for(&self, source: &EventSource) -> &HashSet<String> {
        match source {
            EventSource::Channel(_) => &self.channels,
            EventSource::Bridge(_) => &self.bridges,
            EventSource::Endpoint(_) => &self.endpoints,
            EventSource::DeviceState(_) => &self.device_states,
        }
    }

    fn refresh_from(&mut self, app: &Application) {
        self.channels = app.channel_ids.iter().cloned().collect();
        self.bridges = app.bridge_ids.iter().cloned().collect();
        self.endpoints = app.endpoint_ids.iter().cloned().collect();
        self.device_states = app.device_names.iter().cloned().collect();
    }
}

/// Registry of subscriptions per application name.
///
/// DashMap entry locking serializes updates to each application's four
/// sets while leaving different applications independent.
#[derive(Default)]
#[derive(Debug)]
pub(crate) struct Subscriber {
    apps: DashMap<String, SubscriptionSets>,
}

impl Subscriber {
    fn is_tracked(&self, app_name: &str, source: &EventSource) -> bool {
        self.apps
            .get(app_name)
            .is_some_and(|sets| sets.set_for(source).contains(source.id()))
    }

    fn refresh(&self, app: &Application) {
        self.apps.entry(app.name.clone()).or_default().refresh_from(app);
    }

    /// Subscribe the application to an event source. Idempotent: an
    /// already-tracked identifier is not subscribed a second time, the
    /// current application record is returned instead.
    pub(crate) async fn subscribe(
        &self,
        api: &Applications,
        app_name: &str,
        source: &EventSource,
    ) -> Result<Application> {
        let app = if self.is_tracked(app_name, source) {
            api.get(app_name).await?
        } else {
            api.subscribe(app_name, source).await?
        };
        self.refresh(&app);
        Ok(app)
    }

    /// Unsubscribe from an event source. Unknown identifiers are not an
    /// error at the registry level; server-side failures are surfaced.
    pub(crate) async fn unsubscribe(
        &self,
        api: &Applications,
        app_name: &str,
        source: &EventSource,
    ) -> Result<()> {
        let app = api.unsubscribe(app_name, source).await?;
        self.refresh(&app);
        Ok(())
    }

    /// Fetch the application's current subscription sets from the server
    /// and issue one unsubscribe per identifier across all four
    /// categories. Each call is attempted independently; failures are
    /// logged and swallowed, this runs on the teardown path.
    pub(crate) async fn unsubscribe_all(&self, api: &Applications, app_name: &str) -> Result<()> {
        let app = api.get(app_name).await?;

        let sources = app
            .channel_ids
            .iter()
            .cloned()
            .map(EventSource::Channel)
            .chain(app.bridge_ids.iter().cloned().map(EventSource::Bridge))
            .chain(app.endpoint_ids.iter().cloned().map(EventSource::Endpoint))
            .chain(app.device_names.iter().cloned().map(EventSource::DeviceState));

        for source in sources {
            if let Err(e) = api.unsubscribe(app_name, &source).await {
                tracing::warn!(%source, error = %e, "unsubscribe failed during teardown");
            }
        }

        self.apps.remove(app_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_source_wire_form() {
        assert_eq!(
            EventSource::Channel("1735000000.17".to_owned()).to_string(),
            "channel:1735000000.17"
        );
        assert_eq!(EventSource::Bridge("b1".to_owned()).to_string(), "bridge:b1");
        assert_eq!(
            EventSource::Endpoint("PJSIP/alice".to_owned()).to_string(),
            "endpoint:PJSIP/alice"
        );
        assert_eq!(
            EventSource::DeviceState("office".to_owned()).to_string(),
            "deviceState:office"
        );
    }

    #[test]
    fn tracking_follows_refreshed_records() {
        let subscriber = Subscriber::default();
        let app = Application {
            name: "myapp".to_owned(),
            channel_ids: vec!["c1".to_owned()],
            bridge_ids: vec![],
            endpoint_ids: vec!["PJSIP/alice".to_owned()],
            device_names: vec![],
        };
        subscriber.refresh(&app);

        let channel = EventSource::Channel("c1".to_owned());
        assert!(subscriber.is_tracked("myapp", &channel), "refreshed id is tracked");
        assert!(
            !subscriber.is_tracked("myapp", &EventSource::Bridge("c1".to_owned())),
            "same id in another category is untracked"
        );
        assert!(
            !subscriber.is_tracked("other", &channel),
            "applications are independent"
        );
    }
}
