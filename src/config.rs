use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runtime configuration, assembled from environment variables.
///
/// A `.env` file is honored when present. Required values are checked by
/// [`Config::validate`]; a missing required value aborts startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,

    pub database_url: String,

    pub admin: AdminConfig,

    pub tmdb: TmdbConfig,

    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,

    pub site_name: String,

    pub log_level: String,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            site_name: "Cinedex".to_string(),
            log_level: "info".to_string(),
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(skip_serializing)]
    pub api_key: String,

    pub base_url: String,
}

impl TmdbConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.themoviedb.org/3";
}

/// Optional notification channel. When any field is missing the dispatcher
/// skips sending instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(skip_serializing)]
    pub bot_token: Option<String>,

    pub channel_id: Option<String>,

    /// Public site URL used to build content links in notifications.
    pub site_url: Option<String>,

    #[serde(default)]
    pub api_base_url: String,
}

impl TelegramConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.telegram.org";

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.channel_id.is_some() && self.site_url.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database_url: "sqlite:data/cinedex.db".to_string(),
            admin: AdminConfig {
                username: "admin".to_string(),
                password: String::new(),
            },
            tmdb: TmdbConfig {
                api_key: String::new(),
                base_url: TmdbConfig::DEFAULT_BASE_URL.to_string(),
            },
            telegram: TelegramConfig {
                api_base_url: TelegramConfig::DEFAULT_API_BASE_URL.to_string(),
                ..TelegramConfig::default()
            },
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads configuration from the process environment, honoring `.env`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => defaults.server.port,
        };

        Ok(Self {
            server: ServerConfig {
                port,
                site_name: env_var("SITE_NAME").unwrap_or(defaults.server.site_name),
                log_level: env_var("LOG_LEVEL").unwrap_or(defaults.server.log_level),
                max_db_connections: defaults.server.max_db_connections,
                min_db_connections: defaults.server.min_db_connections,
            },
            database_url: env_var("DATABASE_URL").unwrap_or(defaults.database_url),
            admin: AdminConfig {
                username: env_var("ADMIN_USERNAME").unwrap_or_default(),
                password: env_var("ADMIN_PASSWORD").unwrap_or_default(),
            },
            tmdb: TmdbConfig {
                api_key: env_var("TMDB_API_KEY").unwrap_or_default(),
                base_url: env_var("TMDB_BASE_URL").unwrap_or(defaults.tmdb.base_url),
            },
            telegram: TelegramConfig {
                bot_token: env_var("TELEGRAM_BOT_TOKEN"),
                channel_id: env_var("TELEGRAM_CHANNEL_ID"),
                site_url: env_var("SITE_URL"),
                api_base_url: env_var("TELEGRAM_API_BASE_URL")
                    .unwrap_or(defaults.telegram.api_base_url),
            },
        })
    }

    /// Fails fast on missing required values. There is no degraded mode.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL must be set");
        }

        if self.tmdb.api_key.is_empty() {
            anyhow::bail!("TMDB_API_KEY must be set");
        }

        if self.admin.username.is_empty() || self.admin.password.is_empty() {
            anyhow::bail!("ADMIN_USERNAME and ADMIN_PASSWORD must be set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            admin: AdminConfig {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            tmdb: TmdbConfig {
                api_key: "key".to_string(),
                base_url: TmdbConfig::DEFAULT_BASE_URL.to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database_url, "sqlite:data/cinedex.db");
        assert!(!config.telegram.is_configured());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_tmdb_key() {
        let mut config = test_config();
        config.tmdb.api_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_admin_credentials() {
        let mut config = test_config();
        config.admin.password = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telegram_configured_requires_all_fields() {
        let telegram = TelegramConfig {
            bot_token: Some("token".to_string()),
            channel_id: Some("@channel".to_string()),
            site_url: None,
            api_base_url: TelegramConfig::DEFAULT_API_BASE_URL.to_string(),
        };
        assert!(!telegram.is_configured());
    }
}
