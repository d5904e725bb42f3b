use std::env;
use std::time::Duration;

use crate::error::AppError;
use crate::services::SchedulerConfig;

/// Listener and scheduler settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scheduler: SchedulerConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var::<u16>("SERVER_PORT", 2004)?;
        let pairing = parse_var::<u64>("PAIRING_INTERVAL_SECS", 20)?;
        let sweep = parse_var::<u64>("REGISTRY_SWEEP_INTERVAL_SECS", 10)?;
        for (name, secs) in [
            ("PAIRING_INTERVAL_SECS", pairing),
            ("REGISTRY_SWEEP_INTERVAL_SECS", sweep),
        ] {
            if secs == 0 {
                return Err(AppError::config(format!("{name} must be positive")));
            }
        }
        Ok(Self {
            host,
            port,
            scheduler: SchedulerConfig {
                pairing_interval: Duration::from_secs(pairing),
                sweep_interval: Duration::from_secs(sweep),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{name} is not a valid number: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
