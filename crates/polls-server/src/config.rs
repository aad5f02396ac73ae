use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server settings, read from `POLLS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("POLLS_DB_PATH").unwrap_or_else(|| "polls.db".into()).into();
        let host = lookup("POLLS_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("POLLS_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("POLLS_PORT must be a port number, got '{}'", raw))?,
            None => 8000,
        };

        Ok(Self { db_path, host, port })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address '{}'", addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("polls.db"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("POLLS_DB_PATH", "/var/lib/polls/polls.db"),
            ("POLLS_HOST", "127.0.0.1"),
            ("POLLS_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/polls/polls.db"));
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("POLLS_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("POLLS_PORT", "70000")])).is_err());
    }

    #[test]
    fn bad_host_fails_on_addr() {
        let config = Config::from_lookup(lookup(&[("POLLS_HOST", "not a host")])).unwrap();
        assert!(config.addr().is_err());
    }
}
