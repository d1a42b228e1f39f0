//! Configuration for the `gcf` binary.
//!
//! Loads a `config.toml` given with `--config` (or `GCF_CONFIG`), falling back to the
//! defaults embedded from the crate's own `config.toml`.

use anyhow::{Context, Result};
use gcf_fold::PairingOptions;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Close blocks still open at end of file on the last line.
    pub close_dangling_at_eof: bool,

    /// Marker appended to a collapsed opener line.
    pub ellipsis: String,

    pub icon_open: String,

    pub icon_closed: String,

    /// Prefix rendered lines with their 1-based line number.
    pub line_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            close_dangling_at_eof: false,
            ellipsis: "...".to_string(),
            icon_open: "▾".to_string(),
            icon_closed: "▸".to_string(),
            line_numbers: true,
        }
    }
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` when given, otherwise the embedded defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_embedded(),
        }
    }

    fn load_embedded() -> Result<Self> {
        let source = include_str!("../config.toml");
        toml::from_str(source).context("Failed to parse embedded config.toml")
    }

    pub fn pairing_options(&self) -> PairingOptions {
        PairingOptions {
            close_dangling_at_eof: self.close_dangling_at_eof,
        }
    }
}
