use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_PORT: &str = "5000";
const DEFAULT_TOKEN_TTL_SECS: u32 = 86_400;
const DEFAULT_DB_PORT: u16 = 5432;
const DEVELOPMENT_JWT_SECRET: &str = "rielz-development-secret";

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
    pub auth: AuthConfig,
    /// `None` runs the service on the in-memory store.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match non_empty_var("APP_LOG_FORMAT") {
            Some(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat { value })?,
            None => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            auth: AuthConfig::load(environment)?,
            database: DatabaseConfig::load()?,
        })
    }

    /// Database settings for commands that cannot fall back to memory.
    pub fn require_database(&self) -> Result<&DatabaseConfig, ConfigError> {
        self.database
            .as_ref()
            .ok_or(ConfigError::DatabaseNotConfigured)
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

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Bearer token signing settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u32,
}

impl AuthConfig {
    fn load(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let jwt_secret = match non_empty_var("APP_JWT_SECRET") {
            Some(secret) => secret,
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            None => DEVELOPMENT_JWT_SECRET.to_string(),
        };

        let token_ttl_secs = match non_empty_var("APP_TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTokenTtl)?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
        })
    }

    /// True when tokens would be signed with the built-in development secret.
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// PostgreSQL connection settings, either a full URL or discrete parts.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        name: String,
        password: String,
    },
}

impl DatabaseConfig {
    fn load() -> Result<Option<Self>, ConfigError> {
        if let Some(url) = non_empty_var("DATABASE_URL") {
            return Ok(Some(Self::Url(url)));
        }

        let host = non_empty_var("DB_HOST");
        let user = non_empty_var("DB_USER");
        let name = non_empty_var("DB_NAME");
        let port = non_empty_var("DB_PORT");
        let password = non_empty_var("DB_PASSWORD");
        if host.is_none() && user.is_none() && name.is_none() && port.is_none() {
            return Ok(None);
        }

        let port = match port {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidDatabasePort)?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Some(Self::Parts {
            host: host.ok_or(ConfigError::IncompleteDatabase { missing: "DB_HOST" })?,
            port,
            user: user.ok_or(ConfigError::IncompleteDatabase { missing: "DB_USER" })?,
            name: name.ok_or(ConfigError::IncompleteDatabase { missing: "DB_NAME" })?,
            password: password.unwrap_or_default(),
        }))
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseConfig::Url(_) => f.debug_tuple("Url").field(&"<redacted>").finish(),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                name,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("name", name)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat { value: String },
    MissingJwtSecret,
    InvalidTokenTtl,
    InvalidDatabasePort,
    IncompleteDatabase { missing: &'static str },
    DatabaseNotConfigured,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "APP_JWT_SECRET must be set in production")
            }
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_TOKEN_TTL_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidDatabasePort => write!(f, "DB_PORT must be a valid u16"),
            ConfigError::IncompleteDatabase { missing } => {
                write!(f, "{missing} is required when database settings are provided")
            }
            ConfigError::DatabaseNotConfigured => {
                write!(f, "DATABASE_URL or DB_HOST/DB_USER/DB_NAME must be set")
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
