//! Configuration file handling
//!
//! A run can be configured from a JSON file; command-line flags are
//! applied on top by the binary. Every field is optional in the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{Accent, Distro};

/// Rows that must remain below the header for the fixed layout to be used
pub const DEFAULT_MIN_SCROLL_ROWS: u16 = 3;

/// Settings the display controller needs at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Minimum rows below the reserved header; smaller terminals fall
    /// back to plain scrolling output
    pub min_scroll_rows: u16,
    pub accent: Accent,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_scroll_rows: DEFAULT_MIN_SCROLL_ROWS,
            accent: Accent::default(),
        }
    }
}

/// Run configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub distro: Distro,
    pub dry_run: bool,
    pub min_scroll_rows: u16,
    /// Overrides the distribution's accent colour
    pub accent: Option<Accent>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distro: Distro::default(),
            dry_run: false,
            min_scroll_rows: DEFAULT_MIN_SCROLL_ROWS,
            accent: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_scroll_rows == 0 {
            anyhow::bail!("min_scroll_rows must be at least 1");
        }
        Ok(())
    }

    /// Resolve the settings handed to the display controller
    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            min_scroll_rows: self.min_scroll_rows,
            accent: self.accent.unwrap_or_else(|| self.distro.accent()),
        }
    }
}
