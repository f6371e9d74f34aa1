//! Prometheus metrics

use crate::models::{ModelGroup, ModelSource};
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Setup Prometheus metrics exporter
/// Returns a handle that can be used to retrieve metrics
pub fn setup_metrics() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!("Prometheus metrics exporter installed");

    Ok(handle)
}

/// Record a completed scan and the per-source inventory it found
pub fn record_scan(groups: &[ModelGroup]) {
    metrics::counter!("model_janitor_scans_total").increment(1);

    for source in [ModelSource::HuggingFace, ModelSource::LlamaCpp] {
        let (count, bytes) = groups
            .iter()
            .filter(|g| g.source == source)
            .fold((0usize, 0u64), |(n, b), g| (n + 1, b + g.total_size));

        metrics::gauge!("model_janitor_models_count", "source" => source.to_string())
            .set(count as f64);
        metrics::gauge!("model_janitor_cached_bytes", "source" => source.to_string())
            .set(bytes as f64);
    }
}

/// Record a deletion attempt
pub fn record_deletion(source: ModelSource, deleted: bool) {
    let outcome = if deleted { "success" } else { "failure" };
    metrics::counter!("model_janitor_deletions_total",
        "source" => source.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
