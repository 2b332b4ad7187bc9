//! Button actions: what happens when a configured key is pressed.

pub mod snmp;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Button, ButtonAction, Config, Device, SnmpAction, SnmpCommand};
use crate::device::DeckOperations;
use crate::error::{Result, StroomerError};

use self::snmp::{SetRequest, SnmpClient};

/// What a button press did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A SET request was sent.
    SnmpSet { device: String, oid: String },
    /// Nothing was done; the reason was logged.
    Unsupported { reason: String },
    /// The deck was reset and closed, along with every other open deck.
    DeckClosed,
}

/// Runs the action bound to a button.
pub struct ActionHandler {
    config: Arc<Config>,
    snmp: Arc<dyn SnmpClient>,
    open_decks: Arc<[Arc<dyn DeckOperations>]>,
}

impl ActionHandler {
    pub fn new(config: Arc<Config>, snmp: Arc<dyn SnmpClient>) -> Self {
        Self {
            config,
            snmp,
            open_decks: Vec::<Arc<dyn DeckOperations>>::new().into(),
        }
    }

    /// Decks that an exit button closes besides its own.
    pub fn with_open_decks(mut self, decks: Arc<[Arc<dyn DeckOperations>]>) -> Self {
        self.open_decks = decks;
        self
    }

    /// Run `button`'s action against `deck`.
    ///
    /// # Errors
    ///
    /// [`StroomerError::UnknownDevice`] when an `snmp` button names a device
    /// that is not configured; no request is sent in that case. Transport
    /// errors from the SNMP client or the pressed deck are passed through.
    pub fn handle(&self, deck: &dyn DeckOperations, button: &Button) -> Result<ActionOutcome> {
        match &button.action {
            ButtonAction::Snmp(action) => self.handle_snmp(button, action),
            ButtonAction::Exit => {
                info!(button = %button.name, "Exit pressed; closing decks");
                deck.shutdown()?;
                self.close_open_decks();
                Ok(ActionOutcome::DeckClosed)
            }
        }
    }

    fn handle_snmp(&self, button: &Button, action: &SnmpAction) -> Result<ActionOutcome> {
        let Some(Device::Snmp(device)) = self.config.device(&action.device) else {
            return Err(StroomerError::UnknownDevice {
                button: button.name.clone(),
                device: action.device.clone(),
            });
        };

        match &action.command {
            SnmpCommand::Set => {
                let request = SetRequest::from_action(action)?;
                self.snmp.set(device, &request)?;
                Ok(ActionOutcome::SnmpSet {
                    device: device.name.clone(),
                    oid: request.oid_text,
                })
            }
            SnmpCommand::Get => Ok(unsupported(button, "Get command is currently unsupported")),
            SnmpCommand::Other(command) => Ok(unsupported(
                button,
                &format!("Unsupported command {command}"),
            )),
        }
    }

    /// Close every registered deck so all watchers end.
    fn close_open_decks(&self) {
        for other in self.open_decks.iter().filter(|d| !d.is_closed()) {
            debug!(serial = other.serial(), "Closing deck");
            if let Err(err) = other.close() {
                warn!(serial = other.serial(), error = %err, "Closing deck failed");
            }
        }
    }
}

fn unsupported(button: &Button, reason: &str) -> ActionOutcome {
    warn!(button = %button.name, "{reason}");
    ActionOutcome::Unsupported {
        reason: reason.to_string(),
    }
}
