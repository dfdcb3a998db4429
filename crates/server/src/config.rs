use nbooks_core::storage::{DEFAULT_COVER_BUCKET, StorageConfig};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "library.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {key} has an invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from the environment (and `.env`, loaded by `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub cover_bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = value("NBOOKS_DATABASE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH), PathBuf::from);

        let raw_addr = value("NBOOKS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                key: "NBOOKS_BIND_ADDR",
                value: raw_addr.clone(),
                reason: err.to_string(),
            })?;

        let storage_url =
            value("NBOOKS_STORAGE_URL").ok_or(ConfigError::Missing("NBOOKS_STORAGE_URL"))?;
        if !storage_url.starts_with("http://") && !storage_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "NBOOKS_STORAGE_URL",
                value: storage_url,
                reason: String::from("expected an http(s) URL"),
            });
        }
        let public_url = value("NBOOKS_STORAGE_PUBLIC_URL")
            .unwrap_or_else(|| format!("{}/public", storage_url.trim_end_matches('/')));
        let storage = StorageConfig::new(&storage_url, &public_url, value("NBOOKS_STORAGE_KEY"));

        let cover_bucket =
            value("NBOOKS_COVER_BUCKET").unwrap_or_else(|| DEFAULT_COVER_BUCKET.to_owned());

        Ok(Self {
            database_path,
            bind_addr,
            storage,
            cover_bucket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config =
            config_from(&[("NBOOKS_STORAGE_URL", "https://store.example/storage/v1/object/")])
                .unwrap();
        assert_eq!(config.database_path, PathBuf::from("library.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.cover_bucket, "portadas_libros");
        assert_eq!(
            config.storage.public_base_url,
            "https://store.example/storage/v1/object/public"
        );
        assert_eq!(config.storage.api_key, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NBOOKS_DATABASE_PATH", "/var/lib/nbooks/books.db"),
            ("NBOOKS_BIND_ADDR", "0.0.0.0:3000"),
            ("NBOOKS_STORAGE_URL", "http://localhost:9000"),
            ("NBOOKS_STORAGE_PUBLIC_URL", "https://cdn.example"),
            ("NBOOKS_STORAGE_KEY", "secret"),
            ("NBOOKS_COVER_BUCKET", "covers"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/nbooks/books.db"));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.storage.public_base_url, "https://cdn.example");
        assert_eq!(config.storage.api_key.as_deref(), Some("secret"));
        assert_eq!(config.cover_bucket, "covers");
    }

    #[test]
    fn test_missing_storage_url() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::Missing("NBOOKS_STORAGE_URL"))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[
                ("NBOOKS_STORAGE_URL", "http://localhost:9000"),
                ("NBOOKS_BIND_ADDR", "localhost"),
            ]),
            Err(ConfigError::Invalid {
                key: "NBOOKS_BIND_ADDR",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("NBOOKS_STORAGE_URL", "ftp://files")]),
            Err(ConfigError::Invalid {
                key: "NBOOKS_STORAGE_URL",
                ..
            })
        ));
    }
}
