//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use redirect404::config::{GuardConfig, ProjectConfig, UserConfig};
use redirect404::guard::FilterConfig;
use redirect404::http::HttpServer;
use redirect404::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER1_TOKEN: &str = "user1-token";

/// A running server and the handles tests need to steer it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub filter: Arc<FilterConfig>,
    pub config_updates: mpsc::UnboundedSender<GuardConfig>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// |User     |test1|test2|
/// |:--------|:---:|:---:|
/// |admin    |x    |x    |
/// |user1    |x    |     |
/// |anonymous|x    |     |
pub fn site_config() -> GuardConfig {
    let mut config = GuardConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.security.users = vec![
        UserConfig {
            name: "admin".into(),
            token: ADMIN_TOKEN.into(),
        },
        UserConfig {
            name: "user1".into(),
            token: USER1_TOKEN.into(),
        },
    ];
    config.site.administrators = vec!["admin".into()];
    config.site.projects = vec![
        ProjectConfig {
            name: "test1".into(),
            readers: vec!["user1".into(), "anonymous".into()],
        },
        ProjectConfig {
            name: "test2".into(),
            readers: vec![],
        },
    ];
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();
    config
}

/// Start a server on an ephemeral port with the given flag.
pub async fn start_server(config: GuardConfig, filter: Arc<FilterConfig>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::with_filter(config, filter.clone());
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    TestServer {
        addr,
        filter,
        config_updates,
        shutdown,
    }
}

/// Client that follows redirects, like a browser.
#[allow(dead_code)]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn raw_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Assert that `response` is the login page.
#[allow(dead_code)]
pub async fn assert_is_login_page(response: reqwest::Response) {
    assert_eq!(response.status(), 200);
    assert!(response.url().path() == "/login", "landed on {}", response.url());
    let body = response.text().await.unwrap();
    assert!(body.contains("name=\"login\""), "no login form in {body}");
}
