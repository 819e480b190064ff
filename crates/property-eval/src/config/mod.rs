use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::AppError;
use crate::evaluation::{EvaluationEngine, EvaluationSettings};
use crate::ingest::ReferencePriceImporter;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the evaluation settings come from and which values the environment
/// overrides on top of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub settings_path: Option<PathBuf>,
    pub references_path: Option<PathBuf>,
    pub fx_rate: Option<f64>,
    pub budget_available: Option<f64>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            settings_path: optional_var("PROPERTY_EVAL_SETTINGS").map(PathBuf::from),
            references_path: optional_var("PROPERTY_EVAL_REFERENCES").map(PathBuf::from),
            fx_rate: optional_number("PROPERTY_EVAL_FX_RATE")?,
            budget_available: optional_number("PROPERTY_EVAL_BUDGET")?,
        })
    }

    /// Standard settings, or the settings file, with reference prices and
    /// numeric overrides applied in that order.
    pub fn load_settings(&self) -> Result<EvaluationSettings, AppError> {
        let mut settings = match &self.settings_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading evaluation settings");
                EvaluationSettings::from_path(path)?
            }
            None => EvaluationSettings::standard(),
        };

        if let Some(path) = &self.references_path {
            settings
                .references
                .merge(ReferencePriceImporter::from_path(path)?);
        }
        if let Some(fx_rate) = self.fx_rate {
            settings.fx_rate = fx_rate;
        }
        if let Some(budget) = self.budget_available {
            settings.fees.budget_available = budget;
        }

        Ok(settings)
    }

    pub fn build_engine(&self) -> Result<EvaluationEngine, AppError> {
        Ok(EvaluationEngine::new(self.load_settings()?)?)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional_number(name: &'static str) -> Result<Option<f64>, ConfigError> {
    optional_var(name)
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or(ConfigError::InvalidNumber {
                    variable: name,
                    value,
                })
        })
        .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("{variable} must be a number, got '{value}'")]
    InvalidNumber { variable: &'static str, value: String },
}
