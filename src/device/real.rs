//! Real Stream Deck device implementation.
//!
//! This module wraps the `elgato-streamdeck` crate to provide
//! the concrete device implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use elgato_streamdeck::info::Kind;
use elgato_streamdeck::{StreamDeck, StreamDeckInput};
use hidapi::HidApi;
use image::DynamicImage;
use tracing::{debug, info, trace, warn};

use super::DeckOperations;
use super::info::DeviceInfo;
use crate::error::{Result, StroomerError};

/// Real Stream Deck device wrapper.
///
/// The handle lives behind a mutex; `None` means the deck was closed.
pub struct Deck {
    inner: Mutex<Option<StreamDeck>>,
    info: DeviceInfo,
}

impl Deck {
    /// Connect to a deck by kind and serial.
    pub fn open(hid: &HidApi, kind: Kind, serial: &str) -> Result<Self> {
        debug!(serial, ?kind, "Opening Stream Deck");
        let inner = StreamDeck::connect(hid, kind, serial).map_err(|e| {
            StroomerError::DeviceOpenFailed {
                serial: serial.to_string(),
                reason: e.to_string(),
            }
        })?;

        let firmware = inner
            .firmware_version()
            .unwrap_or_else(|_| "unknown".to_string());
        let serial = inner.serial_number().unwrap_or_else(|_| serial.to_string());

        let info = device_info(kind, serial, firmware);
        Ok(Self {
            inner: Mutex::new(Some(inner)),
            info,
        })
    }

    fn handle(&self) -> MutexGuard<'_, Option<StreamDeck>> {
        // A panic in another thread while holding the lock leaves the handle
        // itself intact.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed(&self) -> StroomerError {
        StroomerError::DeckClosed {
            serial: self.info.serial.clone(),
        }
    }
}

impl DeckOperations for Deck {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn set_key_image(&self, key: u8, image: &DynamicImage) -> Result<()> {
        if key >= self.info.key_count {
            return Err(StroomerError::InvalidKeyIndex {
                index: key,
                max: self.info.key_count,
            });
        }

        let guard = self.handle();
        let deck = guard.as_ref().ok_or_else(|| self.closed())?;
        deck.set_button_image(key, image.clone())
            .map_err(|e| StroomerError::DeviceCommunication(e.to_string()))?;
        deck.flush()
            .map_err(|e| StroomerError::DeviceCommunication(e.to_string()))
    }

    fn reset(&self) -> Result<()> {
        let guard = self.handle();
        let deck = guard.as_ref().ok_or_else(|| self.closed())?;
        deck.reset()
            .map_err(|e| StroomerError::DeviceCommunication(e.to_string()))
    }

    fn close(&self) -> Result<()> {
        if self.handle().take().is_some() {
            info!(serial = %self.info.serial, "Closed Stream Deck");
        }
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        let mut guard = self.handle();
        let Some(deck) = guard.take() else {
            return Err(self.closed());
        };
        let reset = deck
            .reset()
            .map_err(|e| StroomerError::DeviceCommunication(e.to_string()));
        drop(deck);
        info!(serial = %self.info.serial, "Reset and closed Stream Deck");
        reset
    }

    fn is_closed(&self) -> bool {
        self.handle().is_none()
    }

    fn read_key_states(&self, timeout: Duration) -> Result<Option<Vec<bool>>> {
        let guard = self.handle();
        let deck = guard.as_ref().ok_or_else(|| self.closed())?;
        match deck.read_input(Some(timeout)) {
            Ok(StreamDeckInput::ButtonStateChange(states)) => {
                trace!(?states, "Button state change");
                Ok(Some(states))
            }
            Ok(_) => Ok(None),
            Err(e) => Err(StroomerError::DeviceCommunication(e.to_string())),
        }
    }
}

/// List all connected Stream Deck devices without opening them.
pub fn list_decks() -> Result<Vec<DeviceInfo>> {
    let hid = elgato_streamdeck::new_hidapi()
        .map_err(|e| StroomerError::DeviceCommunication(e.to_string()))?;

    Ok(elgato_streamdeck::list_devices(&hid)
        .into_iter()
        .map(|(kind, serial)| device_info(kind, serial, String::new()))
        .collect())
}

/// Open every connected deck that has key displays.
///
/// Decks that fail to open are logged and skipped.
pub fn open_visual_decks() -> Result<Vec<Deck>> {
    let hid = elgato_streamdeck::new_hidapi()
        .map_err(|e| StroomerError::DeviceCommunication(e.to_string()))?;

    let mut decks = Vec::new();
    for (kind, serial) in elgato_streamdeck::list_devices(&hid) {
        if !is_visual(kind) {
            debug!(serial, ?kind, "Skipping deck without key displays");
            continue;
        }
        match Deck::open(&hid, kind, &serial) {
            Ok(deck) => decks.push(deck),
            Err(err) => warn!(serial, error = %err, "Failed to open Stream Deck"),
        }
    }
    Ok(decks)
}

fn device_info(kind: Kind, serial: String, firmware_version: String) -> DeviceInfo {
    let image_format = kind.key_image_format();
    DeviceInfo {
        serial,
        product_name: kind_to_name(kind),
        firmware_version,
        key_count: kind.key_count(),
        key_width: image_format.size.0,
        key_height: image_format.size.1,
        visual: is_visual(kind),
        kind: format!("{kind:?}"),
    }
}

const fn is_visual(kind: Kind) -> bool {
    !matches!(kind, Kind::Pedal)
}

/// Convert device kind to human-readable name.
#[allow(clippy::missing_const_for_fn)] // Returns String which requires allocation
fn kind_to_name(kind: Kind) -> String {
    match kind {
        Kind::Original => "Stream Deck (Original)",
        Kind::OriginalV2 => "Stream Deck (Original V2)",
        Kind::Mini => "Stream Deck Mini",
        Kind::MiniMk2 => "Stream Deck Mini MK.2",
        Kind::Xl => "Stream Deck XL",
        Kind::XlV2 => "Stream Deck XL V2",
        Kind::Mk2 => "Stream Deck MK.2",
        Kind::Pedal => "Stream Deck Pedal",
        Kind::Plus => "Stream Deck +",
        Kind::Neo => "Stream Deck Neo",
        _ => "Unknown Stream Deck",
    }
    .to_string()
}
