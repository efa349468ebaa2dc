//! Prometheus metrics.

use crate::config::MetricsSettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_METRICS_PORT: u16 = 9090;

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are exported.
    pub enabled: bool,
    /// Address of the scrape listener.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from config settings with env overrides
    /// (`SUGGESTBOX_METRICS_ENABLED`, `SUGGESTBOX_METRICS_PORT`).
    #[must_use]
    pub fn from_settings(settings: Option<&MetricsSettings>) -> Self {
        Self::resolve(settings, super::env::lookup_env)
    }

    pub(crate) fn resolve(
        settings: Option<&MetricsSettings>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let enabled = env("SUGGESTBOX_METRICS_ENABLED")
            .map(|value| super::env::parse_bool(&value))
            .or_else(|| settings.and_then(|config| config.enabled))
            .unwrap_or(false);
        let port = env("SUGGESTBOX_METRICS_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .or_else(|| settings.and_then(|config| config.port))
            .unwrap_or(DEFAULT_METRICS_PORT);

        Self {
            enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::resolve(None, |_| None)
    }
}

/// Installs the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from inside a tokio runtime; the listener runs as a task
/// on that runtime. Returns `None` when metrics are disabled, in which case
/// every `metrics::counter!`/`histogram!` call stays a no-op.
pub fn install_prometheus(config: &MetricsConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let runtime = tokio::runtime::Handle::try_current().map_err(|e| Error::OperationFailed {
        operation: "metrics_runtime".to_string(),
        cause: e.to_string(),
    })?;

    let builder = PrometheusBuilder::new().with_http_listener(config.listen_addr);
    let (recorder, exporter) = {
        let _guard = runtime.enter();
        builder.build().map_err(|e| Error::OperationFailed {
            operation: "metrics_exporter_build".to_string(),
            cause: e.to_string(),
        })?
    };
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })?;
    runtime.spawn(exporter);

    tracing::info!(addr = %config.listen_addr, "Prometheus exporter listening");
    Ok(Some(handle))
}
