//! Configuration loading from disk.
//!
//! The config file is a JSON object with optional `temperature`, `top_p` and
//! `top_k` keys, each also accepted as `preferred_<name>`. Loading is
//! best-effort: nothing in here can abort startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::SamplingOverrides;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,
}

/// Raw file contents. `null` deserializes to `None`, which is what makes the
/// canonical key fall through to its alias.
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    temperature: Option<Value>,
    preferred_temperature: Option<Value>,
    top_p: Option<Value>,
    preferred_top_p: Option<Value>,
    top_k: Option<Value>,
    preferred_top_k: Option<Value>,
}

impl FileOverrides {
    fn into_overrides(self) -> SamplingOverrides {
        SamplingOverrides {
            temperature: self
                .temperature
                .or(self.preferred_temperature)
                .and_then(|v| as_float("temperature", v)),
            top_p: self
                .top_p
                .or(self.preferred_top_p)
                .and_then(|v| as_float("top_p", v)),
            top_k: self
                .top_k
                .or(self.preferred_top_k)
                .and_then(|v| as_count("top_k", v)),
        }
    }
}

fn as_float(name: &str, value: Value) -> Option<f64> {
    let parsed = value.as_f64();
    if parsed.is_none() {
        tracing::warn!(param = name, value = %value, "Ignoring non-numeric config value");
    }
    parsed
}

fn as_count(name: &str, value: Value) -> Option<u32> {
    let parsed = value.as_u64().and_then(|v| u32::try_from(v).ok());
    if parsed.is_none() {
        tracing::warn!(param = name, value = %value, "Ignoring non-integer config value");
    }
    parsed
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Read overrides from a config file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_overrides(path: &Path) -> Result<Option<SamplingOverrides>, ConfigError> {
    let path = expand_home(path);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(ConfigError::NotAnObject);
    }
    let raw: FileOverrides = serde_json::from_value(value)?;
    Ok(Some(raw.into_overrides()))
}

/// Load overrides from a config file, treating every failure as "no overrides".
pub fn load_overrides(path: &Path) -> SamplingOverrides {
    match read_overrides(path) {
        Ok(Some(overrides)) => {
            tracing::info!(path = %path.display(), overrides = %overrides, "Loaded config file");
            overrides
        }
        Ok(None) => {
            tracing::info!(path = %path.display(), "Config file not found, continuing without it");
            SamplingOverrides::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not load config file");
            SamplingOverrides::default()
        }
    }
}
