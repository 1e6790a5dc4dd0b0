//! §4.6 server configuration, loaded once from the environment at startup.
//! An invalid value is a startup-time `AppError::Config`, never a panic
//! deep inside a request handler — mirrors the reference backend's
//! `config::db` env-parsing style.

use std::env;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub reaper_interval_secs: u64,
    pub disconnect_grace_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(ServerConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            reaper_interval_secs: parse_u64("REAPER_INTERVAL_SECS", 5)?,
            disconnect_grace_secs: parse_u64("DISCONNECT_GRACE_SECS", 30)?,
        })
    }
}

fn parse_u64(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} must be a non-negative integer, got '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        env::remove_var("BIND_ADDR");
        env::remove_var("REAPER_INTERVAL_SECS");
        env::remove_var("DISCONNECT_GRACE_SECS");
        let cfg = ServerConfig::from_env().unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.reaper_interval_secs, 5);
        assert_eq!(cfg.disconnect_grace_secs, 30);
    }

    #[test]
    fn rejects_a_non_numeric_override() {
        env::set_var("REAPER_INTERVAL_SECS", "soon");
        let result = ServerConfig::from_env();
        env::remove_var("REAPER_INTERVAL_SECS");
        assert!(result.is_err());
    }
}
