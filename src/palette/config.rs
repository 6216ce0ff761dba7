use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::Rgb;
use crate::shared::constants;

/// Palette configuration: the hex colors of the target app's swatches,
/// in the on-screen order they should be registered.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: constants::DEFAULT_PALETTE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PaletteConfig {
    /// Load from an explicit path, or search `pixbot.config` in the
    /// working directory then the user config directory, falling back to
    /// the built-in default palette.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }
        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Self::read(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read palette config {}", path.display()))?;
        let config: PaletteConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid palette config {}", path.display()))?;
        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(constants::APP_NAME).join(constants::CONFIG_FILE));
        }
        paths
    }

    /// Parse the configured hex strings into colors, preserving order.
    pub fn target_colors(&self) -> Result<Vec<Rgb>> {
        self.colors.iter().map(|s| Rgb::from_hex(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_parses() {
        let config = PaletteConfig::default();
        let colors = config.target_colors().unwrap();
        assert_eq!(colors.len(), constants::DEFAULT_PALETTE.len());
        assert_eq!(colors[0].to_hex(), "ffffff");
        assert_eq!(colors[11].to_hex(), "000000");
    }

    #[test]
    fn test_bad_hex_propagates() {
        let config = PaletteConfig {
            colors: vec!["ffffff".into(), "nothex".into()],
        };
        assert!(config.target_colors().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PaletteConfig {
            colors: vec!["000000".into(), "ff7100".into()],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PaletteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.colors, config.colors);
    }
}
