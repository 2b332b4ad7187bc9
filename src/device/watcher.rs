//! Per-deck input thread.
//!
//! Polls a deck for key state vectors, turns them into press/release
//! transitions and hands each one to a [`KeyEventHandler`]. The thread ends
//! when the deck is closed, which is how the process shuts down.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info_span, trace, warn};

use super::DeckOperations;
use crate::error::Result;

/// How long one poll waits for input before checking for closure.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Receives key transitions from a deck.
pub trait KeyEventHandler: Send + Sync {
    /// Called once per transition, in the order the deck reported them.
    fn on_key_event(&self, deck: &dyn DeckOperations, key: u8, pressed: bool) -> Result<()>;
}

/// Keys whose state differs between two state vectors, in key order.
///
/// A key missing from `previous` counts as released.
pub fn transitions(previous: &[bool], current: &[bool]) -> Vec<(u8, bool)> {
    current
        .iter()
        .enumerate()
        .filter(|&(i, &pressed)| previous.get(i).copied().unwrap_or(false) != pressed)
        .filter_map(|(i, &pressed)| u8::try_from(i).ok().map(|key| (key, pressed)))
        .collect()
}

/// Run the input loop on the current thread until the deck closes or the
/// driver fails.
///
/// Handler errors end only that callback: configuration errors are logged
/// as warnings, everything else as errors.
pub fn watch(deck: &dyn DeckOperations, handler: &dyn KeyEventHandler) {
    let mut previous: Vec<bool> = Vec::new();

    while !deck.is_closed() {
        let states = match deck.read_key_states(POLL_TIMEOUT) {
            Ok(Some(states)) => states,
            Ok(None) => continue,
            Err(err) if deck.is_closed() => {
                trace!(error = %err, "Read after close");
                break;
            }
            Err(err) => {
                error!(error = %err, "Reading key states failed; stopping watcher");
                break;
            }
        };

        for (key, pressed) in transitions(&previous, &states) {
            trace!(key, pressed, "Key transition");
            if let Err(err) = handler.on_key_event(deck, key, pressed) {
                if err.is_configuration_error() {
                    warn!(key, error = %err, "Skipping key action");
                } else {
                    error!(key, pressed, error = %err, "Key event failed");
                }
            }
            if deck.is_closed() {
                break;
            }
        }
        previous = states;
    }

    debug!("Deck closed; watcher exiting");
}

/// Spawn a named thread running [`watch`] for one deck.
pub fn spawn_watcher(
    deck: Arc<dyn DeckOperations>,
    handler: Arc<dyn KeyEventHandler>,
) -> std::io::Result<JoinHandle<()>> {
    let serial = deck.serial().to_string();
    thread::Builder::new()
        .name(format!("deck-{serial}"))
        .spawn(move || {
            let _span = info_span!("deck", serial = %serial).entered();
            watch(deck.as_ref(), handler.as_ref());
        })
}
