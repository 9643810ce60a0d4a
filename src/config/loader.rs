//! Settings loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Env {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load settings: optional TOML file, then `.env`, then environment
/// variables, then validation.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = match path {
        Some(path) => read_file(path)?,
        None => Settings::default(),
    };

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(ConfigError::DotEnv(err));
        }
    }

    apply_env_overrides(&mut settings, |key| dotenvy::var(key).ok())?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;
    Ok(settings)
}

/// Parse a TOML settings file without validating it.
pub fn read_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using the flat variable names
/// (`APP_NAME`, `PORT`, `ALLOWED_ORIGINS`, ...).
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    env.string("APP_NAME", &mut settings.app.name);
    env.string("ENVIRONMENT", &mut settings.app.environment);
    env.parse("DEBUG", &mut settings.app.debug)?;

    env.string("HOST", &mut settings.server.host);
    env.parse("PORT", &mut settings.server.port)?;
    env.parse("REQUEST_TIMEOUT_SECS", &mut settings.server.request_timeout_secs)?;
    env.parse("MAX_BODY_BYTES", &mut settings.server.max_body_bytes)?;

    env.string("DATABASE_URL", &mut settings.database.url);

    env.string("ALLOWED_ORIGINS", &mut settings.cors.allowed_origins);
    env.string("ALLOWED_METHODS", &mut settings.cors.allowed_methods);
    env.string("ALLOWED_HEADERS", &mut settings.cors.allowed_headers);

    env.string("LOG_LEVEL", &mut settings.observability.log_level);
    env.parse("LOG_FORMAT", &mut settings.observability.log_format)?;
    env.parse("METRICS_ENABLED", &mut settings.observability.metrics_enabled)?;
    env.string("METRICS_ADDRESS", &mut settings.observability.metrics_address);

    if let Some(key) = (env.lookup)("ADMIN_API_KEY") {
        settings.admin.api_key = Some(key).filter(|k| !k.is_empty());
    }

    Ok(())
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string(&self, key: &'static str, target: &mut String) {
        if let Some(value) = (self.lookup)(key) {
            *target = value;
        }
    }

    fn parse<T>(&self, key: &'static str, target: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Some(value) = (self.lookup)(key) {
            *target = value.trim().parse().map_err(|err: T::Err| ConfigError::Env {
                key,
                value: value.clone(),
                reason: err.to_string(),
            })?;
        }
        Ok(())
    }
}
