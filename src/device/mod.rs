//! Device abstraction layer for Stream Deck devices.
//!
//! The rest of the crate talks to decks only through [`DeckOperations`], so
//! the dispatcher and actions run against [`mock::MockDeck`] in tests.

mod info;
pub mod mock;
mod real;
mod watcher;

pub use info::{DeviceInfo, DeviceModel};
pub use real::{Deck, list_decks, open_visual_decks};
pub use watcher::{KeyEventHandler, POLL_TIMEOUT, spawn_watcher, transitions, watch};

use std::time::Duration;

use image::DynamicImage;

use crate::error::Result;

/// Core deck operations.
///
/// A deck handle does not tolerate concurrent commands. Implementations
/// guard it with a lock held for the duration of exactly one method call,
/// and [`shutdown`](Self::shutdown) performs reset and close inside a single
/// critical section.
///
/// Key indices are 0-based, left-to-right, top-to-bottom.
pub trait DeckOperations: Send + Sync {
    /// Get device information.
    fn info(&self) -> &DeviceInfo;

    /// Number of keys on the deck.
    fn key_count(&self) -> u8 {
        self.info().key_count
    }

    /// Device serial number.
    fn serial(&self) -> &str {
        &self.info().serial
    }

    /// Whether the keys have displays.
    fn is_visual(&self) -> bool {
        self.info().visual
    }

    /// Show an image on a key.
    ///
    /// The image should already match the key dimensions; the driver converts
    /// it to the deck's native format.
    fn set_key_image(&self, key: u8, image: &DynamicImage) -> Result<()>;

    /// Blank every key and restore the deck's idle state.
    fn reset(&self) -> Result<()>;

    /// Release the handle. Later operations fail with `DeckClosed`.
    fn close(&self) -> Result<()>;

    /// Reset and close under one exclusive acquisition.
    fn shutdown(&self) -> Result<()>;

    /// Whether the handle has been closed.
    fn is_closed(&self) -> bool;

    /// Wait up to `timeout` for input and return the full key state vector
    /// if a key changed.
    fn read_key_states(&self, timeout: Duration) -> Result<Option<Vec<bool>>>;
}
