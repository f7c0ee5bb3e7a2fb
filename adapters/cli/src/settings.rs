//! Optional TOML settings consumed by the command line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Defaults loaded from a settings file such as `drawmachine.toml`.
///
/// Every field is optional; command line flags win over file values and
/// built-in defaults fill whatever remains.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Settings {
    /// Upper bound applied to requested step targets.
    pub(crate) max_simulation_steps: Option<u32>,
    /// Canvas width in pixels.
    pub(crate) canvas_width: Option<u32>,
    /// Canvas height in pixels.
    pub(crate) canvas_height: Option<u32>,
}

impl Settings {
    /// Reads and parses the settings file at the provided path.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("settings file is not valid TOML")
    }
}
