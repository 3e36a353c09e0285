//! Configuration file support for hushlock.
//!
//! Settings are read from `~/.config/hushlock/config.toml` when it exists.
//! Every field has a default, and with no file at all the locker behaves
//! exactly as shipped: white `Monospace Bold 42` on black, 24 characters
//! masked with `#`, PAM service `hushlock`.

pub mod types;

pub use types::{AuthConfig, BannerConfig, DisplayConfig, PasswordConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::DEFAULT_SERVICE;
use crate::draw::{Color, FontDescriptor};
use crate::input::DEFAULT_MASK_CHAR;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [display]
/// font_family = "JetBrains Mono"
/// font_size = 36.0
/// foreground = [200, 200, 200]
/// inhibit_idle = true
///
/// [password]
/// max_length = 64
/// mask_char = "*"
///
/// [banner]
/// prefix = "Locked by "
///
/// [auth]
/// service = "login"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Font, colors, and idle behaviour
    #[serde(default)]
    pub display: DisplayConfig,

    /// Buffer size and mask glyph
    #[serde(default)]
    pub password: PasswordConfig,

    /// Banner text
    #[serde(default)]
    pub banner: BannerConfig,

    /// PAM settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped or replaced with their default and a
    /// warning is logged, so a bad config never prevents locking.
    ///
    /// Validated ranges:
    /// - `font_size`: 8.0 - 144.0
    /// - `max_length`: 1 - 256
    /// - `mask_char`: any non-control character
    /// - `service`: non-empty
    fn validate_and_clamp(&mut self) {
        if !(8.0..=144.0).contains(&self.display.font_size) {
            warn!(
                "Invalid font_size {:.1}, clamping to 8.0-144.0 range",
                self.display.font_size
            );
            self.display.font_size = if self.display.font_size.is_nan() {
                42.0
            } else {
                self.display.font_size.clamp(8.0, 144.0)
            };
        }

        if !(1..=256).contains(&self.password.max_length) {
            warn!(
                "Invalid max_length {}, clamping to 1-256 range",
                self.password.max_length
            );
            self.password.max_length = self.password.max_length.clamp(1, 256);
        }

        if self.password.mask_char.is_control() || self.password.mask_char.is_whitespace() {
            warn!(
                "Invalid mask_char {:?}, falling back to '{}'",
                self.password.mask_char, DEFAULT_MASK_CHAR
            );
            self.password.mask_char = DEFAULT_MASK_CHAR;
        }

        let valid_weight = matches!(
            self.display.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .display
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            warn!(
                "Invalid font_weight '{}', falling back to 'bold'",
                self.display.font_weight
            );
            self.display.font_weight = "bold".to_string();
        }

        if self.display.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Monospace'");
            self.display.font_family = "Monospace".to_string();
        }

        if self.auth.service.trim().is_empty() {
            warn!(
                "Empty PAM service name, falling back to '{}'",
                DEFAULT_SERVICE
            );
            self.auth.service = DEFAULT_SERVICE.to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("hushlock");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not valid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Font the lock surface loads at startup.
    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::new(
            self.display.font_family.clone(),
            self.display.font_weight.clone(),
            self.display.font_size,
        )
    }

    pub fn foreground(&self) -> Color {
        Color::from_rgb8(self.display.foreground)
    }

    pub fn background(&self) -> Color {
        Color::from_rgb8(self.display.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, WHITE};
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.password.max_length, 24);
        assert_eq!(config.password.mask_char, '#');
        assert_eq!(config.banner.prefix, "THIS SCREEN IS LOCKED BY ");
        assert_eq!(config.auth.service, "hushlock");
        assert!(!config.display.inhibit_idle);
        assert_eq!(config.font().to_pango_string(), "Monospace Bold 42");
        assert_eq!(config.foreground(), WHITE);
        assert_eq!(config.background(), BLACK);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config(
            r#"
            [password]
            mask_char = "*"

            [display]
            inhibit_idle = true
            "#,
        );
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.password.mask_char, '*');
        assert_eq!(config.password.max_length, 24);
        assert!(config.display.inhibit_idle);
        assert_eq!(config.display.font_family, "Monospace");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let (_dir, path) = write_config(
            r#"
            [display]
            font_size = 500.0
            font_weight = "extra-chunky"

            [password]
            max_length = 0
            mask_char = " "

            [auth]
            service = "  "
            "#,
        );
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.display.font_size, 144.0);
        assert_eq!(config.display.font_weight, "bold");
        assert_eq!(config.password.max_length, 1);
        assert_eq!(config.password.mask_char, '#');
        assert_eq!(config.auth.service, "hushlock");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let (_dir, path) = write_config("[display\nfont_size = ");
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn custom_colors_are_converted() {
        let (_dir, path) = write_config(
            r#"
            [display]
            foreground = [0, 255, 0]
            background = [255, 255, 255]
            "#,
        );
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.foreground(), Color::from_rgb8([0, 255, 0]));
        assert_eq!(config.background(), WHITE);
    }
}
