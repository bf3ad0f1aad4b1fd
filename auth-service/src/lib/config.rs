use std::env;
use std::time::Duration;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Signing secret used when none is configured. Local development only.
pub const DEV_JWT_SECRET: &str = "dev-only-secret-do-not-use-in-production";

/// Flat variable names accepted alongside the `__`-separated ones, so an
/// existing `.env` keeps working. The separated form wins when both are set.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("PORT", "SERVER__PORT"),
    ("JWT_SECRET", "JWT__SECRET"),
];

/// Application configuration for auth-service.
///
/// Every value has a default usable for local development only.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// PostgreSQL credential store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound on pooled connections; further callers queue
    pub max_connections: u32,
    /// How long a queued caller waits for a connection before failing
    pub acquire_timeout_secs: u64,
}

/// Session token configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_secs: i64,
}

impl Config {
    /// Load configuration from defaults, files and environment variables.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (SERVER__PORT, DATABASE__HOST, JWT__SECRET, etc.)
    /// 2. Flat aliases (PORT, JWT_SECRET)
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in development defaults
    ///
    /// # Errors
    /// Returns error if a provided value cannot be parsed
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".to_string());

        let configuration = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .source(Some(aliased(&vars))),
            )
            // Example: DATABASE__HOST=db.internal overrides database.host
            .add_source(Environment::default().separator("__").source(Some(vars)))
            .build()?;

        configuration.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.port", 3000)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "devuser")?
            .set_default("database.password", "devpass")?
            .set_default("database.name", "my_auth_db")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("jwt.secret", DEV_JWT_SECRET)?
            .set_default("jwt.expiration_secs", 3600)
    }

    /// True when the token secret is still the development default.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt.secret == DEV_JWT_SECRET
    }
}

/// Rewrite flat aliases to their `__`-separated keys.
fn aliased(vars: &Map<String, String>) -> Map<String, String> {
    ENV_ALIASES
        .iter()
        .filter_map(|(alias, key)| {
            vars.get(*alias)
                .map(|value| (key.to_string(), value.clone()))
        })
        .collect()
}

impl DatabaseConfig {
    /// Connection options for the sqlx pool.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = Config::defaults()
            .and_then(|builder| builder.build())
            .and_then(|configuration| configuration.try_deserialize())
            .expect("Failed to build default configuration");

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(30));
        assert_eq!(config.jwt.expiration_secs, 3600);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config: Config = Config::defaults()
            .and_then(|builder| builder.set_override("jwt.secret", "production-secret"))
            .and_then(|builder| builder.set_override("server.port", 8080))
            .and_then(|builder| builder.build())
            .and_then(|configuration| configuration.try_deserialize())
            .expect("Failed to build configuration");

        assert_eq!(config.server.port, 8080);
        assert!(!config.uses_dev_secret());
    }

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_separated_environment_variables() {
        let config = Config::from_vars(vars(&[
            ("SERVER__PORT", "4000"),
            ("DATABASE__HOST", "db.internal"),
            ("JWT__SECRET", "from-env"),
        ]))
        .expect("Failed to load configuration");

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.jwt.secret, "from-env");
    }

    #[test]
    fn test_flat_aliases() {
        let config = Config::from_vars(vars(&[("PORT", "8081"), ("JWT_SECRET", "legacy-secret")]))
            .expect("Failed to load configuration");

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.jwt.secret, "legacy-secret");
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_separated_form_wins_over_alias() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8081"),
            ("SERVER__PORT", "9090"),
            ("JWT_SECRET", "legacy-secret"),
            ("JWT__SECRET", "current-secret"),
        ]))
        .expect("Failed to load configuration");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.jwt.secret, "current-secret");
    }
}
