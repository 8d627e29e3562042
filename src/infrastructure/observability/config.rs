//! Observability configuration

use serde::Deserialize;

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    pub enabled: bool,
    /// Metrics endpoint path
    pub path: String,
}

impl MetricsConfig {
    /// `path` as a mountable route: leading slash, no trailing slash
    pub fn route_path(&self) -> String {
        let trimmed = self.path.trim().trim_matches('/');

        if trimmed.is_empty() {
            "/metrics".to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_defaults() {
        let config = MetricsConfig::default();

        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_partial() {
        let config: MetricsConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();

        assert!(!config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_route_path() {
        let mut config = MetricsConfig::default();
        assert_eq!(config.route_path(), "/metrics");

        config.path = "internal/metrics/".to_string();
        assert_eq!(config.route_path(), "/internal/metrics");

        config.path = "  ".to_string();
        assert_eq!(config.route_path(), "/metrics");
    }
}
