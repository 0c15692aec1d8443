use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Secret used when no `SECRET_KEY` is provided. Refused in production.
pub const DEVELOPMENT_SECRET: &str = "secret-dev";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_work_factor: u32,
    pub enable_cors: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set in production")]
    DevelopmentSecretInProduction,

    #[error("bcrypt work factor must be between 4 and 31, got {0}")]
    InvalidWorkFactor(u32),

    #[error("JWT expiry must be at least one hour")]
    InvalidExpiry,
}

/// Replace `target` with the parsed value of `key`; unset or unparseable keeps the default.
fn override_parsed<T: FromStr>(key: &str, target: &mut T) {
    if let Some(v) = env::var(key).ok().and_then(|v| v.trim().parse().ok()) {
        *target = v;
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        override_parsed("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_parsed("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);

        // JOBLY_API_PORT wins over the generic PORT
        override_parsed("PORT", &mut self.api.port);
        override_parsed("JOBLY_API_PORT", &mut self.api.port);
        override_parsed("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging);

        if let Ok(v) = env::var("SECRET_KEY") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        override_parsed("JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours);
        override_parsed("BCRYPT_WORK_FACTOR", &mut self.security.bcrypt_work_factor);
        override_parsed("SECURITY_ENABLE_CORS", &mut self.security.enable_cors);

        self
    }

    /// Reject configurations that would start an insecure or broken server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == Environment::Production && self.security.jwt_secret == DEVELOPMENT_SECRET {
            return Err(ConfigError::DevelopmentSecretInProduction);
        }
        if !(4..=31).contains(&self.security.bcrypt_work_factor) {
            return Err(ConfigError::InvalidWorkFactor(self.security.bcrypt_work_factor));
        }
        if self.security.jwt_expiry_hours == 0 {
            return Err(ConfigError::InvalidExpiry);
        }
        Ok(())
    }

    /// Database name the pool should connect to for this environment.
    pub fn database_name(&self) -> &'static str {
        match self.environment {
            Environment::Test => "jobly_test",
            _ => "jobly",
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/jobly".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_work_factor: 12,
                enable_cors: true,
            },
        }
    }

    fn test() -> Self {
        Self {
            environment: Environment::Test,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/jobly_test".to_string(),
                max_connections: 5,
                connection_timeout: 2,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                jwt_expiry_hours: 1,
                // bcrypt's floor; keeps hashing fast in tests
                bcrypt_work_factor: 4,
                enable_cors: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/jobly".to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                jwt_expiry_hours: 4,
                bcrypt_work_factor: 12,
                enable_cors: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.bcrypt_work_factor, 12);
        assert_eq!(config.database_name(), "jobly");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_uses_cheap_hashing_and_test_database() {
        let config = AppConfig::test();
        assert_eq!(config.security.bcrypt_work_factor, 4);
        assert_eq!(config.database_name(), "jobly_test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_refuses_development_secret() {
        let config = AppConfig::production();
        assert!(matches!(config.validate(), Err(ConfigError::DevelopmentSecretInProduction)));

        let mut config = AppConfig::production();
        config.security.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_work_factor() {
        let mut config = AppConfig::development();
        config.security.bcrypt_work_factor = 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorkFactor(1))));
    }

    #[test]
    fn secret_is_not_serialized() {
        let config = AppConfig::development();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["security"].get("jwt_secret").is_none());
    }
}
