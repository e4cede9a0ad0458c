//! Service settings
//!
//! Loaded from an optional `config/membership.*` file, then overridden by
//! `MEMBERSHIP_*` environment variables using `__` between sections
//! (for example `MEMBERSHIP_SERVER__PORT=4000`).

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
    pub throttle: ThrottleSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where members and tokens are kept
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Members in PostgreSQL, tokens in Redis
    Postgres,
    /// Everything in process memory, lost on restart
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThrottleSettings {
    pub enabled: bool,
    pub max_failures: u32,
    pub window_seconds: u64,
    pub lockout_seconds: u64,
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "postgres")?
            .set_default("log.level", "info")?
            .set_default("throttle.enabled", true)?
            .set_default("throttle.max_failures", 5)?
            .set_default("throttle.window_seconds", 300)?
            .set_default("throttle.lockout_seconds", 900)?
            .add_source(config::File::with_name("config/membership").required(false))
            .add_source(
                config::Environment::with_prefix("MEMBERSHIP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.bind_address(), "0.0.0.0:3000");
        assert_eq!(settings.storage.backend, StorageBackend::Postgres);
        assert_eq!(settings.log.level, "info");
        assert!(settings.throttle.enabled);
        assert_eq!(settings.throttle.max_failures, 5);
        assert_eq!(settings.throttle.window_seconds, 300);
        assert_eq!(settings.throttle.lockout_seconds, 900);
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("MEMBERSHIP_SERVER__PORT", "4000");
            std::env::set_var("MEMBERSHIP_STORAGE__BACKEND", "memory");
            std::env::set_var("MEMBERSHIP_THROTTLE__ENABLED", "false");
        }

        let settings = Settings::load();

        unsafe {
            std::env::remove_var("MEMBERSHIP_SERVER__PORT");
            std::env::remove_var("MEMBERSHIP_STORAGE__BACKEND");
            std::env::remove_var("MEMBERSHIP_THROTTLE__ENABLED");
        }

        let settings = settings.unwrap();
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert!(!settings.throttle.enabled);
    }
}
