use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use voxorb_vad::VadConfigPatch;

/// Demo settings, loadable from a TOML file. Every field is optional;
/// command-line flags take precedence over file values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrbSettings {
    pub device: Option<String>,
    pub tick_ms: Option<u64>,
    pub vad: VadConfigPatch,
}

impl OrbSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing settings file {}", path.display()))
    }
}
