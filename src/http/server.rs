//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the subsystems (filter flag, identity, security, site ACLs)
//! - Create the Axum Router with site and admin handlers
//! - Wire up middleware (request ID, tracing, timeout, identity, guard)
//! - Apply reloaded configuration while serving
//! - Serve until shutdown

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{setup_admin_router, AdminState};
use crate::config::GuardConfig;
use crate::guard::{FilterConfig, ResponseInterceptor, StoreError};
use crate::http::challenge::LoginChallenge;
use crate::http::middleware::{not_found_guard, resolve_identity, GuardState};
use crate::identity::{IdentityProvider, TokenIdentityProvider};
use crate::security::{ConfiguredSecurity, SecurityState};
use crate::site::{setup_site_router, ProjectAcl, SiteState};

/// Subsystems whose state follows configuration reloads.
#[derive(Clone)]
struct Reloadable {
    security: Arc<ConfiguredSecurity>,
    identity: Arc<TokenIdentityProvider>,
    projects: Arc<ProjectAcl>,
}

impl Reloadable {
    fn apply(&self, current: &GuardConfig, new: &GuardConfig) {
        self.security.set_enforced(new.security.enabled);
        self.identity.replace_users(&new.security.users);
        self.projects.replace(&new.site);

        if current.listener.bind_address != new.listener.bind_address
            || current.security.login_path != new.security.login_path
            || current.admin.enabled != new.admin.enabled
            || current.admin.api_key != new.admin.api_key
            || current.timeouts.request_secs != new.timeouts.request_secs
        {
            tracing::warn!("Listener, login path, admin and timeout changes take effect after restart");
        }
        tracing::info!("Configuration reloaded");
    }
}

/// HTTP server hosting the site behind the not-found guard.
pub struct HttpServer {
    router: Router,
    config: GuardConfig,
    filter: Arc<FilterConfig>,
    reloadable: Reloadable,
}

impl HttpServer {
    /// Create a server, loading the enablement flag from its state file.
    pub fn new(config: GuardConfig) -> Result<Self, StoreError> {
        let filter = FilterConfig::load(&config.filter.state_path, config.filter.enabled)?;
        Ok(Self::with_filter(config, Arc::new(filter)))
    }

    /// Create a server around an existing enablement flag.
    pub fn with_filter(config: GuardConfig, filter: Arc<FilterConfig>) -> Self {
        let reloadable = Reloadable {
            security: Arc::new(ConfiguredSecurity::new(config.security.enabled)),
            identity: Arc::new(TokenIdentityProvider::new(&config.security.users)),
            projects: Arc::new(ProjectAcl::new(&config.site)),
        };

        let router = Self::build_router(&config, &filter, &reloadable);
        Self {
            router,
            config,
            filter,
            reloadable,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, filter: &Arc<FilterConfig>, reloadable: &Reloadable) -> Router {
        let identity: Arc<dyn IdentityProvider> = reloadable.identity.clone();
        let security: Arc<dyn SecurityState> = reloadable.security.clone();

        let guard_state = GuardState {
            interceptor: Arc::new(ResponseInterceptor::new(
                filter.clone(),
                identity.clone(),
                security.clone(),
            )),
            challenge: LoginChallenge::new(&config.security.login_path),
        };

        let site_state = SiteState {
            projects: reloadable.projects.clone(),
            security: security.clone(),
        };

        let mut router = setup_site_router(site_state, &config.security.login_path);

        if config.admin.enabled {
            router = router.merge(setup_admin_router(AdminState {
                filter: filter.clone(),
                security,
                api_key: Arc::from(config.admin.api_key.as_str()),
            }));
        }

        router
            .layer(middleware::from_fn_with_state(guard_state, not_found_guard))
            .layer(middleware::from_fn_with_state(identity, resolve_identity))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` fires, applying configurations
    /// received on `config_updates` as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GuardConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            filter_enabled = self.filter.is_enabled(),
            security_enforced = self.reloadable.security.is_enforced(),
            "HTTP server starting"
        );

        let reloadable = self.reloadable.clone();
        let mut current = self.config.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                reloadable.apply(&current, &new_config);
                current = new_config;
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        reload_task.abort();
        tracing::info!("HTTP server stopped");
        result
    }

    /// The enablement flag served by this instance.
    pub fn filter(&self) -> &Arc<FilterConfig> {
        &self.filter
    }
}
