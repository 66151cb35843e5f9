//! Where the offline store lives.

use std::path::PathBuf;

use anyhow::Context;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "GRANJA_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database; gone when the store is dropped.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
}

impl StoreConfig {
    /// `GRANJA_DB_PATH` if set, otherwise `{app_data_dir}/granja/offline.db`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(DB_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Ok(Self::at(path.trim())),
            _ => {
                let path = default_db_path()?;
                tracing::debug!(?path, "GRANJA_DB_PATH not set; using default store path");
                Ok(Self::at(path))
            }
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
        }
    }
}

/// `{app_data_dir}/granja/offline.db`, falling back to `~/.local/share`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    dir.push("granja");
    dir.push("offline.db");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig::from_lookup(|key| {
            (key == DB_PATH_ENV).then(|| " /tmp/granja-test.db ".to_string())
        })
        .unwrap();
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from("/tmp/granja-test.db"))
        );
    }

    #[test]
    fn blank_path_falls_back_to_default() {
        let config = StoreConfig::from_lookup(|_| Some("   ".to_string()));
        // No data or home directory in some sandboxes.
        if let Ok(config) = config {
            match config.location {
                StoreLocation::File(path) => assert!(path.ends_with("granja/offline.db")),
                StoreLocation::Memory => panic!("default must be a file"),
            }
        }
    }

    #[test]
    fn from_env_reads_the_process_environment() {
        let expected = StoreConfig::from_lookup(|key| std::env::var(key).ok());
        let actual = StoreConfig::from_env();
        match (expected, actual) {
            (Ok(expected), Ok(actual)) => assert_eq!(actual, expected),
            (Err(_), Err(_)) => {}
            (expected, actual) => panic!("mismatch: {expected:?} vs {actual:?}"),
        }
    }

    #[test]
    fn in_memory_location() {
        assert_eq!(StoreConfig::in_memory().location, StoreLocation::Memory);
    }
}
