//! Application configuration and constants.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{self, DEFAULT_PORT, SHARED_PORT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Redraw tick in milliseconds
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (~3s at the default tick)
    pub status_timeout_ticks: u64,

    /// Lines to scroll a response panel per key press
    pub scroll_step: u16,

    /// Scheme and host every backend lives on
    pub host: String,

    /// Port used for every model by the shared-prompt variant
    pub shared_port: u16,

    /// Port for model ids missing from the port table
    pub default_port: u16,

    /// Per-model port overrides, merged over the built-in table
    pub ports: BTreeMap<String, u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            scroll_step: 3,
            host: "http://localhost".to_string(),
            shared_port: SHARED_PORT,
            default_port: DEFAULT_PORT,
            ports: BTreeMap::new(),
        }
    }
}

impl Config {
    /// `{config_dir}/llm-compare/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("llm-compare").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location when none is
    /// given. Only the default location is allowed to be missing.
    pub fn load(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        match custom_path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Port for a model in the independent variant: override, then the
    /// built-in table, then the default port.
    pub fn port_for(&self, model_id: &str) -> u16 {
        self.ports
            .get(model_id)
            .copied()
            .or_else(|| models::table_port(model_id))
            .unwrap_or(self.default_port)
    }

    /// `{host}:{port}/api/{model}/{percent-encoded prompt}`
    pub fn endpoint(&self, model_id: &str, port: u16, prompt: &str) -> String {
        format!(
            "{}:{}/api/{}/{}",
            self.host.trim_end_matches('/'),
            port,
            model_id,
            urlencoding::encode(prompt)
        )
    }
}

/// Key hints shown in the footer
pub const KEY_HINTS: &[(&str, &str)] = &[
    ("Enter", "submit"),
    ("Alt+Enter", "newline"),
    ("Tab", "next model"),
    ("PgUp/PgDn", "scroll"),
    ("Ctrl+U", "clear"),
    ("Esc", "quit"),
];
