//! Export configuration
//!
//! Parses an optional `quail-export.toml`. Every field has a default, and
//! the defaults reproduce the stock conversion behavior.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub textures: TextureConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Property category tag that marks a texture reference
    pub category: u32,
    /// Case-insensitive substring a texture property name must contain
    pub keyword: String,
    /// Decode a property's inline payload instead of fetching by value
    pub prefer_inline: bool,
}

/// Property category the archive parser uses for texture references.
pub const TEXTURE_CATEGORY: u32 = 2;

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            category: TEXTURE_CATEGORY,
            keyword: "texture".to_string(),
            prefer_inline: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub targets: TargetMode,
}

/// Which skinned instances each bone track is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Every track is bound to every instance
    #[default]
    All,
    /// Every track is bound to the first instance only
    First,
}

/// Load and parse a config file
pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config = parse_config(&content).with_context(|| format!("Invalid config: {:?}", path))?;
    Ok(config)
}

/// Parse and validate config text
pub fn parse_config(content: &str) -> Result<ExportConfig> {
    let config: ExportConfig = toml::from_str(content).context("Failed to parse config TOML")?;
    validate(&config)?;
    Ok(config)
}

/// Validate config without running a conversion
pub fn validate(config: &ExportConfig) -> Result<()> {
    if config.textures.keyword.trim().is_empty() {
        bail!("textures.keyword must not be empty");
    }
    Ok(())
}
