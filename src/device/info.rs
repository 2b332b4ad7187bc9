//! Device information types for Stream Deck devices.

use serde::Serialize;

/// Information about a Stream Deck device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device serial number
    pub serial: String,
    /// Human-readable product name
    pub product_name: String,
    /// Firmware version string
    pub firmware_version: String,
    /// Number of keys on the device
    pub key_count: u8,
    /// Width of key images in pixels
    pub key_width: usize,
    /// Height of key images in pixels
    pub key_height: usize,
    /// Whether the keys have displays
    pub visual: bool,
    /// Device kind/model identifier
    pub kind: String,
}

/// Stream Deck device models, used to shape mock devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceModel {
    /// Stream Deck Mini (6 keys, 3x2)
    Mini,
    /// Stream Deck Original (15 keys, 5x3)
    Original,
    /// Stream Deck MK.2 (15 keys, 5x3)
    Mk2,
    /// Stream Deck XL (32 keys, 8x4)
    Xl,
    /// Stream Deck Pedal (3 pedals, no display)
    Pedal,
    /// Stream Deck + (8 keys + LCD + dials)
    Plus,
}

impl DeviceModel {
    /// Returns the number of keys for this device model.
    #[must_use]
    pub const fn key_count(self) -> u8 {
        match self {
            Self::Mini => 6,
            Self::Original | Self::Mk2 => 15,
            Self::Xl => 32,
            Self::Pedal => 3,
            Self::Plus => 8,
        }
    }

    /// Returns the key image dimensions (width, height) in pixels.
    #[must_use]
    pub const fn key_dimensions(self) -> (u32, u32) {
        match self {
            Self::Mini => (80, 80),
            Self::Original | Self::Mk2 => (72, 72),
            Self::Xl => (96, 96),
            Self::Pedal => (0, 0), // No display
            Self::Plus => (120, 120),
        }
    }

    /// Returns true if the keys can show images.
    #[must_use]
    pub const fn is_visual(self) -> bool {
        !matches!(self, Self::Pedal)
    }

    /// Returns a human-readable name for this device model.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mini => "Stream Deck Mini",
            Self::Original => "Stream Deck (Original)",
            Self::Mk2 => "Stream Deck MK.2",
            Self::Xl => "Stream Deck XL",
            Self::Pedal => "Stream Deck Pedal",
            Self::Plus => "Stream Deck +",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_model_key_count() {
        assert_eq!(DeviceModel::Mini.key_count(), 6);
        assert_eq!(DeviceModel::Mk2.key_count(), 15);
        assert_eq!(DeviceModel::Xl.key_count(), 32);
    }

    #[test]
    fn test_pedal_is_not_visual() {
        assert!(!DeviceModel::Pedal.is_visual());
        assert_eq!(DeviceModel::Pedal.key_dimensions(), (0, 0));
        assert!(DeviceModel::Mk2.is_visual());
    }
}
