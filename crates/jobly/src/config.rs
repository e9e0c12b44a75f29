//! Database configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! [database]
//! url = "postgres://${DB_USER}@localhost/jobly"
//! max_size = 8
//! ```
//!
//! or from the environment (`DATABASE_URL`, optional `JOBLY_DB_MAX_SIZE`),
//! after loading a `.env` file if one exists. `${VAR}` references in the TOML
//! url are expanded from the environment.

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MAX_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    database: DatabaseConfig,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Parse the `[database]` table of a TOML document.
    pub fn from_toml_str(raw: &str) -> JoblyResult<Self> {
        let file: ConfigFile = toml::from_str(raw)
            .map_err(|e| JoblyError::Config(format!("failed to parse config: {e}")))?;
        let mut config = file.database;
        config.url = expand_env_vars(&config.url, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> JoblyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JoblyError::Config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Build from `DATABASE_URL` and `JOBLY_DB_MAX_SIZE`, loading `.env` first.
    pub fn from_env() -> JoblyResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let url = lookup("DATABASE_URL")
            .ok_or_else(|| JoblyError::Config("DATABASE_URL is not set".to_string()))?;
        let max_size = match lookup("JOBLY_DB_MAX_SIZE") {
            Some(raw) => raw.trim().parse().map_err(|e| {
                JoblyError::Config(format!("invalid JOBLY_DB_MAX_SIZE {raw:?}: {e}"))
            })?,
            None => DEFAULT_MAX_SIZE,
        };
        let config = Self { url, max_size };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> JoblyResult<()> {
        if self.url.trim().is_empty() {
            return Err(JoblyError::Config("database.url must not be empty".to_string()));
        }
        if self.max_size == 0 {
            return Err(JoblyError::Config(
                "database.max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(JoblyError::Config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(JoblyError::Config(
                    "invalid env var reference: ${}".to_string(),
                ));
            }

            let v = lookup(&key).ok_or_else(|| {
                JoblyError::Config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
