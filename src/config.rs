use serde::Deserialize;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::{IpAddr, SocketAddr};

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_file_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("SONGPOP_HOST") {
            config.host = host
                .parse()
                .with_context(|| format!("Invalid SONGPOP_HOST: {}", host))?;
        }
        if let Some(port) = lookup("SONGPOP_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid SONGPOP_PORT: {}", port))?;
        }
        if let Some(size) = lookup("SONGPOP_MAX_FILE_SIZE") {
            config.max_file_size = size
                .parse()
                .with_context(|| format!("Invalid SONGPOP_MAX_FILE_SIZE: {}", size))?;
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SONGPOP_HOST", "0.0.0.0"),
            ("SONGPOP_PORT", "8080"),
            ("SONGPOP_MAX_FILE_SIZE", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_invalid_value_is_error() {
        let err = Config::from_lookup(lookup_from(&[("SONGPOP_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("SONGPOP_PORT"));
    }
}
