//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect404_challenges_total` (counter): not-found responses replaced
//!   by a login challenge
//! - `redirect404_passthrough_total` (counter, `reason`): requests left
//!   untouched (`disabled`, `security_off`, `identity_unavailable`,
//!   `not_challenged`)
//! - `redirect404_enabled` (gauge): 1 when the filter is enabled
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_challenge() {
    counter!("redirect404_challenges_total").increment(1);
}

pub fn record_passthrough(reason: &'static str) {
    counter!("redirect404_passthrough_total", "reason" => reason).increment(1);
}

pub fn record_enabled(enabled: bool) {
    gauge!("redirect404_enabled").set(if enabled { 1.0 } else { 0.0 });
}
