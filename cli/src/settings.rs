use anyhow::{Context, Result};
use penmaze_core::Profile;
use penmaze_tracker::TrackerConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_TICK_MS: u64 = 50;

/// Optional settings file. Anything given on the command line wins.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub profile: Option<Profile>,
    pub cell_size: Option<u32>,
    pub tick_ms: Option<u64>,
    pub tracker: TrackerConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.tracker.validate()?;
        Ok(settings)
    }
}
