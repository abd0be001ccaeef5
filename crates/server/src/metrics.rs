//! Prometheus metrics
//!
//! Installs the global recorder once and serves the rendered exposition at
//! `/metrics`. Counters are emitted from the classify handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder (idempotent)
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Render the current metrics
pub async fn metrics_handler() -> String {
    HANDLE.get().map(|handle| handle.render()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let _ = init_metrics();
        let _ = init_metrics();
        metrics::counter!("lead_scorer_test_counter").increment(1);
        let rendered = metrics_handler().await;
        assert!(rendered.contains("lead_scorer_test_counter"));
    }
}
