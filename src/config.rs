use crate::rate_limit::RateLimitConfig;
use std::env;

/// Credentials of the administrator seeded on startup.
///
/// When `token` is `None` a fresh token is generated at startup and logged once.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub user_id: String,
    pub username: String,
    pub token: Option<String>,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        AdminCredentials {
            user_id: "admin".to_string(),
            username: "admin".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub admin: AdminCredentials,
    pub rate_limits: RateLimitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: "data/livechat.db".to_string(),
            admin: AdminCredentials::default(),
            rate_limits: RateLimitConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            admin: AdminCredentials {
                user_id: env::var("ADMIN_USER_ID").unwrap_or(defaults.admin.user_id),
                username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
                token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            },
            rate_limits: RateLimitConfig::from_env(),
        }
    }
}
