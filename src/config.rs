use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::platform::Platform;

/// Default number of one-time provider initialization attempts.
pub const DEFAULT_INIT_ATTEMPTS: u32 = 3;

/// Resolution class requested from the shell's system image lists.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconSize {
    /// 16×16
    Small,
    /// 32×32
    Large,
    /// 48×48
    ExtraLarge,
    /// 256×256
    #[default]
    Jumbo,
}

impl IconSize {
    /// Nominal edge length in pixels. The OS may hand back a different size.
    pub const fn pixels(&self) -> u32 {
        match self {
            IconSize::Small => 16,
            IconSize::Large => 32,
            IconSize::ExtraLarge => 48,
            IconSize::Jumbo => 256,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "small" => Some(IconSize::Small),
            "large" => Some(IconSize::Large),
            "extra_large" | "extralarge" => Some(IconSize::ExtraLarge),
            "jumbo" => Some(IconSize::Jumbo),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub icon_size: IconSize,
    pub init_attempts: u32,
    /// Overrides the detected platform when set.
    pub platform: Option<Platform>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            icon_size: IconSize::default(),
            init_attempts: DEFAULT_INIT_ATTEMPTS,
            platform: None,
        }
    }
}

impl EngineConfig {
    /// Attempts actually made at startup; zero still means one try.
    pub fn attempts(&self) -> u32 {
        self.init_attempts.max(1)
    }
}

/// Load the engine configuration, falling back to defaults when the file is missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    Ok(config)
}
