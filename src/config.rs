use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, sourced from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_version: String,
    pub environment: String,
    pub database_url: String,
    pub database_name: String,
    pub access_timeout: Duration,
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub jwt_issuer: String,
    pub cors_allow_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse_number::<u16>("APP_PORT", &get("APP_PORT", "8080"))?;
        let access_timeout_secs = parse_number::<u64>(
            "MONGODB_ACCESS_TIMEOUT",
            &get("MONGODB_ACCESS_TIMEOUT", "5"),
        )?;
        let jwt_expire_hours = parse_number::<i64>("JWT_EXPIRE", &get("JWT_EXPIRE", "24"))?;

        let cors_allow_origins = get("CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: get("APP_HOST", "0.0.0.0"),
            port,
            app_version: get("APP_VERSION", env!("CARGO_PKG_VERSION")),
            environment: get("ENVIRONMENT", "local"),
            database_url: get("DATABASE_URL", "mongodb://localhost:27017"),
            database_name: get("MONGODB_DB_NAME", "one-to-one"),
            access_timeout: Duration::from_secs(access_timeout_secs),
            jwt_secret: get("JWT_SECRET", "token-secret"),
            jwt_expire_hours,
            jwt_issuer: get("JWT_ISSUER", "one-to-one-service"),
            cors_allow_origins,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allow_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
