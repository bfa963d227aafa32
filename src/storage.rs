use crate::errors::AppError;
use crate::models::CounterRecord;
use chrono::NaiveDateTime;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub const DEFAULT_DATA_PATH: &str = "data/counters.json";

pub fn resolve_data_path() -> PathBuf {
    match env::var("APP_DATA_PATH") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}

/// Reads the stored counter list. A missing file is an empty list; a file
/// that cannot be read or parsed is logged and also treated as empty.
pub async fn load_counters(path: &Path, now: NaiveDateTime) -> Vec<CounterRecord> {
    let mut counters: Vec<CounterRecord> = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(counters) => counters,
            Err(err) => {
                error!("failed to parse counters file {}: {err}", path.display());
                return Vec::new();
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            error!("failed to read counters file {}: {err}", path.display());
            return Vec::new();
        }
    };

    for counter in &mut counters {
        counter.migrate(now);
    }
    info!(count = counters.len(), "counters loaded");
    counters
}

pub async fn persist_counters(path: &Path, counters: &[CounterRecord]) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(counters).map_err(AppError::internal)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(AppError::internal)?;
    }
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Removes the stored list entirely.
pub async fn clear_counters(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(AppError::internal(err)),
    }
}
