use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub public_dir: PathBuf,
    pub backend_timeout: Option<Duration>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_timeout = match lookup("BACKEND_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("BACKEND_TIMEOUT_SECS is not a number: {}", secs))?,
            )),
            None => None,
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT is not a valid port number")?,
            backend_url: lookup("BACKEND_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            backend_timeout,
            log_level: lookup("LOG_LEVEL")
                .unwrap_or_else(|| "info".to_string()),
        })
    }
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert!(config.backend_timeout.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("BACKEND_URL", "http://rag:8000/"),
            ("PUBLIC_DIR", "/srv/public"),
            ("BACKEND_TIMEOUT_SECS", "15"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.backend_url, "http://rag:8000");
        assert_eq!(config.public_dir, PathBuf::from("/srv/public"));
        assert_eq!(config.backend_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn bad_numbers_fail() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BACKEND_TIMEOUT_SECS", "-1")])).is_err());
    }
}
