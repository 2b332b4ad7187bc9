//! Mock deck implementation for testing.
//!
//! Records every operation, keeps the last image written to each key and
//! replays scripted key states through [`DeckOperations::read_key_states`].
//!
//! # Example
//!
//! ```rust,ignore
//! use stroomer::device::mock::{MockDeck, Operation};
//! use stroomer::device::DeckOperations;
//!
//! let mock = MockDeck::mk2();
//! mock.shutdown().unwrap();
//! mock.assert_operations(&[Operation::Reset, Operation::Close]);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, trace};

use super::DeckOperations;
use super::info::{DeviceInfo, DeviceModel};
use crate::error::{Result, StroomerError};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SetKeyImage { key: u8 },
    Reset,
    Close,
}

#[derive(Default)]
struct MockState {
    closed: bool,
    images: Vec<Option<DynamicImage>>,
    operations: Vec<Operation>,
    input: VecDeque<Vec<bool>>,
    injected_error: Option<StroomerError>,
}

/// Mock deck for testing without real hardware.
pub struct MockDeck {
    info: DeviceInfo,
    state: Mutex<MockState>,
    close_when_drained: AtomicBool,
}

impl MockDeck {
    /// Create a new mock deck for the specified model.
    #[must_use]
    pub fn new(model: DeviceModel) -> Self {
        let (width, height) = model.key_dimensions();
        let key_count = model.key_count();

        debug!(?model, "Creating mock deck");

        Self {
            info: DeviceInfo {
                serial: format!("MOCK-{model:?}-001"),
                product_name: model.display_name().to_string(),
                firmware_version: "1.0.0-mock".to_string(),
                key_count,
                key_width: width as usize,
                key_height: height as usize,
                visual: model.is_visual(),
                kind: format!("{model:?}"),
            },
            state: Mutex::new(MockState {
                images: vec![None; key_count as usize],
                ..MockState::default()
            }),
            close_when_drained: AtomicBool::new(false),
        }
    }

    /// Create mock for Stream Deck MK.2 (15 keys).
    #[must_use]
    pub fn mk2() -> Self {
        Self::new(DeviceModel::Mk2)
    }

    /// Create mock for Stream Deck Mini (6 keys).
    #[must_use]
    pub fn mini() -> Self {
        Self::new(DeviceModel::Mini)
    }

    /// Create mock for Stream Deck XL (32 keys).
    #[must_use]
    pub fn xl() -> Self {
        Self::new(DeviceModel::Xl)
    }

    /// Close the deck once all scripted key states have been read, so a
    /// watcher loop over it terminates.
    #[must_use]
    pub fn close_when_drained(self) -> Self {
        self.close_when_drained.store(true, Ordering::SeqCst);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Input Simulation ===

    /// Queue a full key state vector.
    pub fn queue_states(&self, states: Vec<bool>) {
        self.state().input.push_back(states);
    }

    /// Queue a press of `key` followed by its release, all other keys up.
    pub fn queue_tap(&self, key: u8) {
        let mut pressed = vec![false; self.info.key_count as usize];
        if let Some(slot) = pressed.get_mut(key as usize) {
            *slot = true;
        }
        self.queue_states(pressed);
        self.queue_states(vec![false; self.info.key_count as usize]);
    }

    /// Fail the next operation with `error`.
    pub fn inject_error(&self, error: StroomerError) {
        self.state().injected_error = Some(error);
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }

    /// Last image written to `key`.
    #[must_use]
    pub fn key_image(&self, key: u8) -> Option<DynamicImage> {
        self.state().images.get(key as usize).cloned().flatten()
    }

    /// Number of images written to `key`.
    #[must_use]
    pub fn image_writes(&self, key: u8) -> usize {
        self.state()
            .operations
            .iter()
            .filter(|op| **op == Operation::SetKeyImage { key })
            .count()
    }

    /// Assert specific operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    // === Internal Helpers ===

    fn begin(&self, state: &mut MockState) -> Result<()> {
        if let Some(error) = state.injected_error.take() {
            return Err(error);
        }
        if state.closed {
            return Err(StroomerError::DeckClosed {
                serial: self.info.serial.clone(),
            });
        }
        Ok(())
    }
}

impl DeckOperations for MockDeck {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn set_key_image(&self, key: u8, image: &DynamicImage) -> Result<()> {
        let mut state = self.state();
        self.begin(&mut state)?;
        if key >= self.info.key_count {
            return Err(StroomerError::InvalidKeyIndex {
                index: key,
                max: self.info.key_count,
            });
        }

        trace!(key, "Recording key image");
        state.operations.push(Operation::SetKeyImage { key });
        state.images[key as usize] = Some(image.clone());
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let mut state = self.state();
        self.begin(&mut state)?;
        state.operations.push(Operation::Reset);
        state.images.iter_mut().for_each(|image| *image = None);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state();
        if !state.closed {
            state.closed = true;
            state.operations.push(Operation::Close);
        }
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        let mut state = self.state();
        self.begin(&mut state)?;
        state.operations.push(Operation::Reset);
        state.images.iter_mut().for_each(|image| *image = None);
        state.closed = true;
        state.operations.push(Operation::Close);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn read_key_states(&self, timeout: Duration) -> Result<Option<Vec<bool>>> {
        let mut state = self.state();
        self.begin(&mut state)?;
        if let Some(states) = state.input.pop_front() {
            return Ok(Some(states));
        }
        if self.close_when_drained.load(Ordering::SeqCst) {
            state.closed = true;
            return Ok(None);
        }
        drop(state);
        std::thread::sleep(timeout);
        Ok(None)
    }
}
