//! Error types for stroomer operations.

use thiserror::Error;

/// Primary error type for stroomer.
#[derive(Error, Debug)]
pub enum StroomerError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Button '{button}' references unknown device '{device}'")]
    UnknownDevice { button: String, device: String },

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    // Asset errors
    #[error("Asset file not found: {path}")]
    AssetNotFound { path: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Failed to load font '{path}': {reason}")]
    FontLoad { path: String, reason: String },

    // SNMP errors
    #[error("Invalid OID '{0}': expected dotted decimal like 1.3.6.1.2.1.1.5.0")]
    InvalidOid(String),

    #[error("Value '{value}' for OID {oid} is not a valid integer")]
    InvalidInteger { oid: String, value: String },

    #[error("SNMP request to {host} failed: {reason}")]
    Snmp { host: String, reason: String },

    // Device errors
    #[error("No Stream Deck devices found")]
    NoDevicesFound,

    #[error("Failed to open device '{serial}': {reason}")]
    DeviceOpenFailed { serial: String, reason: String },

    #[error("Device communication error: {0}")]
    DeviceCommunication(String),

    #[error("Device '{serial}' is closed")]
    DeckClosed { serial: String },

    #[error("Invalid key index {index}: device has {max} keys")]
    InvalidKeyIndex { index: u8, max: u8 },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StroomerError {
    /// Returns true for errors caused by configuration content.
    ///
    /// These are logged and skipped at runtime instead of treated as failures.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse(_)
                | Self::UnknownDevice { .. }
                | Self::ConfigInvalid(_)
                | Self::InvalidOid(_)
                | Self::InvalidInteger { .. }
        )
    }

    /// Returns true for missing or unreadable icons and fonts.
    pub const fn is_asset_error(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. } | Self::ImageProcessing(_) | Self::FontLoad { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoDevicesFound => Some("Ensure the Stream Deck is connected via USB"),
            Self::ConfigNotFound { .. } => Some("Pass --config or create stroomer.ini"),
            Self::UnknownDevice { .. } => {
                Some("Add a [section] with type = device under that name")
            }
            Self::AssetNotFound { .. } | Self::FontLoad { .. } => {
                Some("Check --assets points at the directory holding the icons and font")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using StroomerError.
pub type Result<T> = std::result::Result<T, StroomerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_device_is_configuration_error() {
        let err = StroomerError::UnknownDevice {
            button: "Lights".to_string(),
            device: "printer9".to_string(),
        };
        assert!(err.is_configuration_error());
        assert!(!err.is_asset_error());
        assert!(err.to_string().contains("printer9"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_asset_errors() {
        let err = StroomerError::AssetNotFound {
            path: "/nope/Exit.png".to_string(),
        };
        assert!(err.is_asset_error());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_transport_errors_are_neither() {
        let err = StroomerError::Snmp {
            host: "10.0.0.5".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(!err.is_configuration_error());
        assert!(!err.is_asset_error());
        assert_eq!(err.suggestion(), None);
    }
}
