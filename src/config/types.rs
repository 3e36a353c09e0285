//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::auth::DEFAULT_SERVICE;
use crate::input::{DEFAULT_MASK_CHAR, DEFAULT_MAX_LEN};
use crate::session::DEFAULT_BANNER_PREFIX;

/// Appearance of the lock surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Font family name for the banner and password line
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", or numeric 100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font size in points (valid range: 8.0 - 144.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Text color as `[red, green, blue]`, 0-255 per component
    #[serde(default = "default_foreground")]
    pub foreground: [u8; 3],

    /// Background color as `[red, green, blue]`, 0-255 per component
    #[serde(default = "default_background")]
    pub background: [u8; 3],

    /// Keep the screensaver and power saving from kicking in while locked
    #[serde(default)]
    pub inhibit_idle: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_size: default_font_size(),
            foreground: default_foreground(),
            background: default_background(),
            inhibit_idle: false,
        }
    }
}

/// Password entry behaviour.
#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Maximum number of characters accepted (valid range: 1 - 256)
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Glyph drawn for every typed character
    #[serde(default = "default_mask_char")]
    pub mask_char: char,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            mask_char: default_mask_char(),
        }
    }
}

/// Banner drawn above the password line.
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerConfig {
    /// Text placed before the upper-cased user name
    #[serde(default = "default_banner_prefix")]
    pub prefix: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            prefix: default_banner_prefix(),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// PAM service name, i.e. the policy file under `/etc/pam.d`
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
        }
    }
}

fn default_font_family() -> String {
    "Monospace".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_font_size() -> f64 {
    42.0
}

fn default_foreground() -> [u8; 3] {
    [255, 255, 255]
}

fn default_background() -> [u8; 3] {
    [0, 0, 0]
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LEN
}

fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

fn default_banner_prefix() -> String {
    DEFAULT_BANNER_PREFIX.to_string()
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}
