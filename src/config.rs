//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;

use serde::{Deserialize, Serialize};

use crate::entity::AdminCredentials;

/// Placeholder admin pair used when nothing is stored or configured.
pub const DEFAULT_ADMIN_ID: &str = "sunnysoni";
pub const DEFAULT_ADMIN_PASSWORD: &str = "*SunnyGalaxyAdmin";

/// Configuration for the galaxy CLI and data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Admin id seeded when no credentials are stored
    pub admin_id: String,
    /// Admin password seeded when no credentials are stored
    pub admin_password: String,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            admin_id: DEFAULT_ADMIN_ID.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl GalaxyConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            log_level: env::var("GALAXY_LOG_LEVEL").unwrap_or(defaults.log_level),
            admin_id: env::var("GALAXY_ADMIN_ID").unwrap_or(defaults.admin_id),
            admin_password: env::var("GALAXY_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }

    /// The seed credentials as a stored record.
    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials {
            user_id: self.admin_id.clone(),
            password: self.admin_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GalaxyConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.admin_id, "sunnysoni");
        assert_eq!(config.admin_password, "*SunnyGalaxyAdmin");
    }

    #[test]
    fn test_admin_credentials_from_config() {
        let config = GalaxyConfig {
            admin_id: "root".to_string(),
            admin_password: "hunter2".to_string(),
            ..GalaxyConfig::default()
        };
        let creds = config.admin_credentials();
        assert_eq!(creds.user_id, "root");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_serialization() {
        let config = GalaxyConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GalaxyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.admin_id, config.admin_id);
        assert_eq!(parsed.log_level, config.log_level);
    }
}
