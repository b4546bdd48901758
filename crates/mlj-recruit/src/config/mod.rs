use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::registration::guard::RateLimitPolicy;

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
    pub admin: AdminConfig,
    pub rate_limit: RateLimitPolicy,
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

        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_default();
        if environment == AppEnvironment::Production && admin_password.is_empty() {
            return Err(ConfigError::MissingAdminPassword);
        }
        let admin_password = if admin_password.is_empty() {
            "change-me".to_string()
        } else {
            admin_password
        };

        let rate_limit = load_rate_limit_policy()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            admin: AdminConfig {
                email: admin_email,
                password: admin_password,
            },
            rate_limit,
        })
    }
}

fn load_rate_limit_policy() -> Result<RateLimitPolicy, ConfigError> {
    let defaults = RateLimitPolicy::default();

    let window_minutes = match env::var("APP_RATE_LIMIT_WINDOW_MINUTES") {
        Ok(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidRateLimitWindow)?,
        Err(_) => defaults.window_minutes,
    };

    let max_submissions = match env::var("APP_RATE_LIMIT_MAX_SUBMISSIONS") {
        Ok(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|count| *count > 0)
            .ok_or(ConfigError::InvalidRateLimitCount)?,
        Err(_) => defaults.max_submissions,
    };

    Ok(RateLimitPolicy {
        window_minutes,
        max_submissions,
    })
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

/// Credentials the bundled identity adapter accepts for the admin console.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRateLimitWindow,
    InvalidRateLimitCount,
    MissingAdminPassword,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRateLimitWindow => {
                write!(f, "APP_RATE_LIMIT_WINDOW_MINUTES must be a positive integer")
            }
            ConfigError::InvalidRateLimitCount => {
                write!(f, "APP_RATE_LIMIT_MAX_SUBMISSIONS must be a positive integer")
            }
            ConfigError::MissingAdminPassword => {
                write!(f, "ADMIN_PASSWORD must be set when APP_ENV is production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
