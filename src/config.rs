use crate::storage::resolve_data_path;
use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TICK_MS: u64 = 1000;
const MIN_TICK_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub tick_interval: Duration,
}

impl Config {
    /// Reads `PORT`, `APP_DATA_PATH` and `TICK_INTERVAL_MS`. Values that do
    /// not parse fall back to the defaults.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let tick_ms = env::var("TICK_INTERVAL_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .max(MIN_TICK_MS);

        Self {
            port,
            data_path: resolve_data_path(),
            tick_interval: Duration::from_millis(tick_ms),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
