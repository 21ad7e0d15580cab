//! SDK configuration.
//!
//! Covers the two decisions a host application makes up front: which
//! transports to discover cameras on, and which frame formats a capture
//! session should produce. Everything else is a per-device property set at
//! runtime through [`crate::Camera`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::frame::{FrameFormat, FrameFormats};
use crate::manager::DiscoveryMode;

/// Transport discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Discover cameras on USB.
    pub usb: bool,
    /// Discover cameras on SPI.
    pub spi: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            usb: true,
            spi: false,
        }
    }
}

impl DiscoveryConfig {
    /// The discovery mode to create a [`crate::Manager`] with.
    pub fn mode(&self) -> DiscoveryMode {
        let mut mode = DiscoveryMode::empty();
        if self.usb {
            mode |= DiscoveryMode::USB;
        }
        if self.spi {
            mode |= DiscoveryMode::SPI;
        }
        mode
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.usb && !self.spi {
            return Err(ConfigError::NoTransports);
        }
        Ok(())
    }
}

/// Capture session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Frame formats to produce on every capture event.
    pub formats: Vec<FrameFormat>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            formats: vec![FrameFormat::Grayscale],
        }
    }
}

impl CaptureSettings {
    /// The format set to start capture sessions with.
    pub fn formats(&self) -> FrameFormats {
        self.formats.iter().copied().collect()
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.formats.is_empty() {
            return Err(ConfigError::NoFormats);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("no discovery transports enabled")]
    NoTransports,
    #[error("no capture formats configured")]
    NoFormats,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SdkConfig {
    /// Transport discovery section.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Capture session section.
    #[serde(default)]
    pub capture: CaptureSettings,
}

impl SdkConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: SdkConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.discovery.validate()?;
        self.capture.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SdkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discovery.mode(), DiscoveryMode::USB);
        assert_eq!(config.capture.formats(), FrameFormats::GRAYSCALE);
    }

    #[test]
    fn test_all_transports_disabled_invalid() {
        let config = DiscoveryConfig {
            usb: false,
            spi: false,
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoTransports)));
    }

    #[test]
    fn test_empty_format_list_invalid() {
        let config = CaptureSettings { formats: vec![] };
        assert!(matches!(config.validate(), Err(ConfigError::NoFormats)));
    }

    #[test]
    fn test_parse_toml_sections() {
        let config: SdkConfig = toml::from_str(
            r#"
            [discovery]
            usb = true
            spi = true

            [capture]
            formats = ["grayscale", "thermography_float"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.discovery.mode(),
            DiscoveryMode::USB | DiscoveryMode::SPI
        );
        assert_eq!(config.capture.formats().bits(), 0x50);
    }
}
