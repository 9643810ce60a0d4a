//! Configuration schema definitions.
//!
//! This module defines the complete settings structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root settings for the API server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Application identity.
    pub app: AppConfig,

    /// Listener and request limits.
    pub server: ServerConfig,

    /// Database connection (reported by the detailed health check).
    pub database: DatabaseConfig,

    /// Cross-origin resource sharing.
    pub cors: CorsConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Admin endpoint protection.
    pub admin: AdminConfig,
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Display name used in greetings and health reports.
    pub name: String,

    /// Deployment environment label (development, staging, production).
    pub environment: String,

    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Storefront API".to_string(),
            environment: "development".to_string(),
            debug: true,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl DatabaseConfig {
    /// The URL with everything after the scheme masked.
    pub fn masked_url(&self) -> String {
        let scheme = self.url.split("://").next().unwrap_or_default();
        format!("{scheme}://***")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:///./storefront.db".to_string(),
        }
    }
}

/// CORS configuration. Each field is a comma-separated list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: String,
    pub allowed_methods: String,
    pub allowed_headers: String,
}

impl CorsConfig {
    pub fn allowed_origins_list(&self) -> Vec<String> {
        split_list(&self.allowed_origins)
    }

    pub fn allowed_methods_list(&self) -> Vec<String> {
        split_list(&self.allowed_methods)
    }

    pub fn allowed_headers_list(&self) -> Vec<String> {
        split_list(&self.allowed_headers)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "http://localhost:3000,http://localhost:8080".to_string(),
            allowed_methods: "GET,POST,PUT,DELETE,PATCH".to_string(),
            allowed_headers: "*".to_string(),
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token for `/api/v1/admin/*`. Without one every admin call is forbidden.
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.app.name, "Storefront API");
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.observability.log_format, LogFormat::Pretty);
        assert!(settings.admin.api_key.is_none());
    }

    #[test]
    fn test_list_splitting() {
        let cors = CorsConfig {
            allowed_origins: " http://a.test , http://b.test,,".into(),
            ..Default::default()
        };
        assert_eq!(cors.allowed_origins_list(), vec!["http://a.test", "http://b.test"]);
        assert_eq!(
            CorsConfig::default().allowed_methods_list(),
            vec!["GET", "POST", "PUT", "DELETE", "PATCH"]
        );
        assert_eq!(CorsConfig::default().allowed_headers_list(), vec!["*"]);
    }

    #[test]
    fn test_masked_database_url() {
        let db = DatabaseConfig {
            url: "postgres://user:secret@db:5432/shop".into(),
        };
        assert_eq!(db.masked_url(), "postgres://***");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 9001

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9001);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.observability.log_format, LogFormat::Json);
        assert_eq!(settings.app, AppConfig::default());
    }
}
