use crate::reports::{BarangayRegistry, ReportOptions};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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

/// Top-level configuration for the reporting service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reporting: ReportingConfig,
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
            reporting: ReportingConfig::from_env()?,
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

/// Report shaping knobs and the municipal barangay list.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub trend_periods: usize,
    pub top_barangays: usize,
    pub registry: BarangayRegistry,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        let options = ReportOptions::default();
        Self {
            trend_periods: options.trend_periods,
            top_barangays: options.top_barangays,
            registry: BarangayRegistry::default(),
        }
    }
}

impl ReportingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let trend_periods = positive_var("PWD_TREND_PERIODS", defaults.trend_periods)
            .map_err(|value| ConfigError::InvalidTrendPeriods { value })?;
        let top_barangays = positive_var("PWD_TOP_BARANGAYS", defaults.top_barangays)
            .map_err(|value| ConfigError::InvalidTopBarangays { value })?;
        let registry = env::var("PWD_BARANGAYS")
            .map(|raw| BarangayRegistry::from_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            trend_periods,
            top_barangays,
            registry,
        })
    }

    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            trend_periods: self.trend_periods,
            top_barangays: self.top_barangays,
        }
    }
}

/// Reads a count of at least one; the offending raw value is returned on failure.
fn positive_var(name: &str, default: usize) -> Result<usize, String> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value >= 1 => Ok(value),
            _ => Err(raw),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTrendPeriods { value: String },
    InvalidTopBarangays { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTrendPeriods { value } => {
                write!(f, "PWD_TREND_PERIODS must be a whole number of at least 1, got '{value}'")
            }
            ConfigError::InvalidTopBarangays { value } => {
                write!(f, "PWD_TOP_BARANGAYS must be a whole number of at least 1, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTrendPeriods { .. }
            | ConfigError::InvalidTopBarangays { .. } => None,
        }
    }
}
