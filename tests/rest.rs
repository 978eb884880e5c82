#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

//! Integration tests for the REST execution path and session bootstrap.
//!
//! These tests use `httpmock` to mock server responses, ensuring
//! deterministic and fast test execution without requiring a running
//! Asterisk instance.

use asterisk_ari_client::error::{Kind, RestError};
use asterisk_ari_client::{Ari, AriConfig, AriVersion, EventSource};
use httpmock::MockServer;
use serde_json::json;

fn config(base_url: &str, version: Option<AriVersion>) -> AriConfig {
    AriConfig::builder()
        .url(base_url)
        .app("myapp")
        .username("user")
        .password("pass")
        .maybe_version(version)
        .build()
}

async fn session(server: &MockServer) -> Ari {
    Ari::build(config(&server.base_url(), Some(AriVersion::V6_0_0)))
        .await
        .unwrap()
}

mod auto_detect {
    use super::*;

    #[tokio::test]
    async fn maps_api_version_to_dialect() -> anyhow::Result<()> {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/api-docs/resources.json")
                .header_exists("authorization");
            then.status(200).json_body(json!({
                "basePath": "http://pbx:8088/ari",
                "apiVersion": "2.0.0"
            }));
        });

        let ari = Ari::build(config(&server.base_url(), None)).await?;

        assert_eq!(ari.version(), AriVersion::V2_0_0);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn missing_marker_is_unsupported_version() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/api-docs/resources.json");
            then.status(200).json_body(json!({ "basePath": "x" }));
        });

        let err = Ari::build(config(&server.base_url(), None))
            .await
            .expect_err("no apiVersion marker");
        assert_eq!(err.kind(), Kind::UnsupportedVersion);
    }

    #[tokio::test]
    async fn unknown_version_is_unsupported() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/api-docs/resources.json");
            then.status(200).json_body(json!({ "apiVersion": "99.1.0" }));
        });

        let err = Ari::build(config(&server.base_url(), None))
            .await
            .expect_err("no dialect for 99.x");
        assert_eq!(err.kind(), Kind::UnsupportedVersion);
    }

    #[tokio::test]
    async fn detection_failure_aborts_construction() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/api-docs/resources.json");
            then.status(503).body("service unavailable");
        });

        let err = Ari::build(config(&server.base_url(), None))
            .await
            .expect_err("bootstrap call failed");
        assert_eq!(err.kind(), Kind::Rest);
        assert!(err.is_status(503), "raw status is preserved");
    }
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn credentials_travel_as_api_key_query_pair() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/myapp")
                .query_param("api_key", "user:pass");
            then.status(200).json_body(json!({ "name": "myapp" }));
        });

        let app = ari.applications()?.get("myapp").await?;

        assert_eq!(app.name, "myapp");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn expected_code_uses_call_site_description() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/ghost");
            then.status(404).body("{\"message\":\"no such app\"}");
        });

        let err = ari
            .applications()?
            .get("ghost")
            .await
            .expect_err("server said 404");

        assert_eq!(err.kind(), Kind::Rest);
        let rest = err.downcast_ref::<RestError>().unwrap();
        assert_eq!(rest.status_code, 404);
        assert_eq!(rest.description.as_deref(), Some("Application does not exist"));
        assert!(rest.body.contains("no such app"), "raw body is preserved");

        Ok(())
    }

    #[tokio::test]
    async fn unexpected_code_falls_back_to_generic_failure() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/myapp");
            then.status(500).body("boom");
        });

        let err = ari
            .applications()?
            .get("myapp")
            .await
            .expect_err("server said 500");

        let rest = err.downcast_ref::<RestError>().unwrap();
        assert_eq!(rest.status_code, 500);
        assert_eq!(rest.description, None, "500 is not in the expected table");
        assert_eq!(rest.body, "boom");

        Ok(())
    }

    #[tokio::test]
    async fn accepted_and_no_content_classify_as_success() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        server.mock(|when, then| {
            when.method(httpmock::Method::DELETE)
                .path("/ari/channels/c1");
            then.status(204);
        });

        ari.channels()?.hangup("c1", Some("normal")).await?;

        Ok(())
    }

    #[tokio::test]
    async fn fields_body_shape_for_config_updates() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::PUT)
                .path("/ari/asterisk/config/dynamic/res_pjsip/endpoint/alice")
                .json_body(json!({
                    "fields": [
                        { "attribute": "context", "value": "default" },
                        { "attribute": "allow", "value": "ulaw" },
                    ]
                }));
            then.status(200).body("{}");
        });

        ari.asterisk()?
            .update_config_object(
                "res_pjsip",
                "endpoint",
                "alice",
                &[
                    ("context".to_owned(), "default".to_owned()),
                    ("allow".to_owned(), "ulaw".to_owned()),
                ],
            )
            .await?;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn variables_body_shape_for_originate() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/ari/channels")
                .query_param("endpoint", "PJSIP/alice")
                .query_param("app", "myapp")
                .json_body(json!({
                    "variables": { "CALLERID(name)": "Queue" }
                }));
            then.status(200).json_body(json!({
                "id": "c9",
                "name": "PJSIP/alice-00000001",
                "state": "Down"
            }));
        });

        let channel = ari
            .channels()?
            .originate(
                "PJSIP/alice",
                None,
                &[("CALLERID(name)".to_owned(), "Queue".to_owned())],
            )
            .await?;

        assert_eq!(channel.id, "c9");
        mock.assert();
        Ok(())
    }
}

mod dialects {
    use super::*;

    #[tokio::test]
    async fn v0_dialect_rejects_newer_capabilities() {
        let server = MockServer::start();
        let ari = Ari::build(config(&server.base_url(), Some(AriVersion::V0_0_1)))
            .await
            .unwrap();

        let err = ari.mailboxes().expect_err("mailboxes are not in 0.0.1");
        assert_eq!(err.kind(), Kind::NotSupported);
        let err = ari.device_states().expect_err("device states are not in 0.0.1");
        assert_eq!(err.kind(), Kind::NotSupported);

        assert!(ari.channels().is_ok(), "channels exist in every dialect");
    }
}

mod subscriptions {
    use super::*;

    fn app_body(channels: &[&str], bridges: &[&str], devices: &[&str]) -> serde_json::Value {
        json!({
            "name": "myapp",
            "channel_ids": channels,
            "bridge_ids": bridges,
            "endpoint_ids": [],
            "device_names": devices,
        })
    }

    #[tokio::test]
    async fn subscribe_is_idempotent_per_identifier() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        let post = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/ari/applications/myapp/subscription")
                .query_param("eventSource", "channel:c1");
            then.status(200).json_body(app_body(&["c1"], &[], &[]));
        });
        let get = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/myapp");
            then.status(200).json_body(app_body(&["c1"], &[], &[]));
        });

        let source = EventSource::Channel("c1".to_owned());
        ari.subscribe(&source).await?;
        ari.subscribe(&source).await?;

        post.assert_hits(1);
        get.assert_hits(1);

        Ok(())
    }

    #[tokio::test]
    async fn unsubscribe_all_walks_every_category_independently() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/myapp");
            then.status(200)
                .json_body(app_body(&["c1", "c2", "c3"], &["b1"], &["d1", "d2"]));
        });

        // One category's unsubscribe fails; the rest must still be attempted.
        let failing = server.mock(|when, then| {
            when.method(httpmock::Method::DELETE)
                .path("/ari/applications/myapp/subscription")
                .query_param("eventSource", "bridge:b1");
            then.status(422).body("{}");
        });
        let deletes: Vec<_> = ["channel:c1", "channel:c2", "channel:c3", "deviceState:d1", "deviceState:d2"]
            .into_iter()
            .map(|source| {
                server.mock(|when, then| {
                    when.method(httpmock::Method::DELETE)
                        .path("/ari/applications/myapp/subscription")
                        .query_param("eventSource", source);
                    then.status(200).json_body(app_body(&[], &[], &[]));
                })
            })
            .collect();

        ari.unsubscribe_all().await?;

        failing.assert_hits(1);
        for delete in &deletes {
            delete.assert_hits(1);
        }

        Ok(())
    }
}

mod teardown {
    use super::*;

    #[tokio::test]
    async fn calls_after_close_fail_with_client_shutdown() -> anyhow::Result<()> {
        let server = MockServer::start();
        let ari = session(&server).await;

        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/ari/applications/myapp");
            then.status(200).json_body(json!({ "name": "myapp" }));
        });

        ari.close().await;

        let err = ari.applications().expect_err("session is torn down");
        assert_eq!(err.kind(), Kind::ClientShutdown);
        let err = ari.events().expect_err("session is torn down");
        assert_eq!(err.kind(), Kind::ClientShutdown);

        Ok(())
    }
}
