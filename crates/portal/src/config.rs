//! Runtime configuration, read from the environment.

use std::path::PathBuf;

use thiserror::Error;

use campus_auth::FileCredentialStore;
use campus_core::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CAMPUS_API_URL must be an http(s) URL, got '{0}'")]
    ApiUrl(String),
    #[error("CAMPUS_PAGE_SIZE must be a positive integer, got '{0}'")]
    PageSize(String),
    #[error("no data directory available; set CAMPUS_STORE_PATH")]
    NoStorePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_url: String,
    pub store_path: PathBuf,
    pub page_size: u32,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get("CAMPUS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::ApiUrl(api_url));
        }

        let store_path = match get("CAMPUS_STORE_PATH") {
            Some(path) => PathBuf::from(path),
            None => FileCredentialStore::default_path().ok_or(ConfigError::NoStorePath)?,
        };

        let page_size = match get("CAMPUS_PAGE_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ConfigError::PageSize(raw)),
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            api_url,
            store_path,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let cfg = PortalConfig::from_lookup(lookup(&[
            ("CAMPUS_API_URL", "https://campus.example/api"),
            ("CAMPUS_STORE_PATH", "/tmp/campus.json"),
            ("CAMPUS_PAGE_SIZE", "10"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, "https://campus.example/api");
        assert_eq!(cfg.store_path, PathBuf::from("/tmp/campus.json"));
        assert_eq!(cfg.page_size, 10);
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let cfg = PortalConfig::from_lookup(lookup(&[
            ("CAMPUS_API_URL", "  "),
            ("CAMPUS_STORE_PATH", "/tmp/s.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_size = PortalConfig::from_lookup(lookup(&[
            ("CAMPUS_STORE_PATH", "/tmp/s.json"),
            ("CAMPUS_PAGE_SIZE", "0"),
        ]));
        assert_eq!(bad_size, Err(ConfigError::PageSize("0".into())));

        let bad_url = PortalConfig::from_lookup(lookup(&[
            ("CAMPUS_API_URL", "localhost:5000"),
            ("CAMPUS_STORE_PATH", "/tmp/s.json"),
        ]));
        assert_eq!(bad_url, Err(ConfigError::ApiUrl("localhost:5000".into())));
    }
}
