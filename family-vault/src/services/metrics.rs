//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Safe to call more than once; later calls return the first handle. If a
/// different global recorder is already installed, the returned handle
/// renders an empty exposition.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            PrometheusBuilder::new().build_recorder().handle()
        }
    })
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Names of the domain counters recorded by the handlers.
pub mod names {
    pub const DOCUMENTS_UPLOADED: &str = "documents_uploaded_total";
    pub const DOCUMENT_UPLOAD_BYTES: &str = "document_upload_bytes";
    pub const DOCUMENTS_DELETED: &str = "documents_deleted_total";
    pub const PROFILE_UPDATES: &str = "profile_updates_total";
}
