//! Admin API for the enablement flag.

use std::sync::Arc;

use redirect404::guard::FilterConfig;
use serde_json::{json, Value};

mod common;

use common::{raw_client, site_config, start_server, ADMIN_KEY};

#[tokio::test]
async fn test_configuration_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("redirect404.toml");
    let filter = Arc::new(FilterConfig::load(&state_path, false).unwrap());
    let server = start_server(site_config(), filter).await;
    let client = raw_client();

    let res = client
        .put(server.url("/admin/redirect404"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "enabled": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(server.filter.is_enabled());

    let res = client.get(server.url("/nosuchpage")).send().await.unwrap();
    assert_eq!(res.status(), 303);

    // Persisted across restarts.
    assert!(FilterConfig::load(&state_path, false).unwrap().is_enabled());
}

#[tokio::test]
async fn test_configuration_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("redirect404.toml");
    let filter = Arc::new(FilterConfig::load(&state_path, true).unwrap());
    let server = start_server(site_config(), filter).await;
    let client = raw_client();

    let res = client
        .put(server.url("/admin/redirect404"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "enabled": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .get(server.url("/admin/redirect404"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "enabled": false }));

    let res = client.get(server.url("/nosuchpage")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert!(!FilterConfig::load(&state_path, true).unwrap().is_enabled());
}

#[tokio::test]
async fn test_admin_requires_key() {
    let server = start_server(site_config(), Arc::new(FilterConfig::in_memory(false))).await;
    let client = raw_client();

    let res = client
        .put(server.url("/admin/redirect404"))
        .json(&json!({ "enabled": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    assert!(!server.filter.is_enabled());

    let res = client
        .get(server.url("/admin/status"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn test_status_reports_flags() {
    let server = start_server(site_config(), Arc::new(FilterConfig::in_memory(true))).await;

    let res = raw_client()
        .get(server.url("/admin/status"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["filter_enabled"], true);
    assert_eq!(body["security_enforced"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
