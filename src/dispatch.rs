//! Key event dispatcher.
//!
//! On every transition the key is re-rendered; on a press the bound action
//! runs as well.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::action::snmp::SnmpClient;
use crate::action::{ActionHandler, ActionOutcome};
use crate::config::Config;
use crate::device::{DeckOperations, KeyEventHandler};
use crate::error::Result;
use crate::render::render_style;
use crate::style::{Assets, KeyStyle, key_style};

/// Routes key transitions to rendering and actions.
pub struct Dispatcher {
    config: Arc<Config>,
    assets: Assets,
    actions: ActionHandler,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, assets: Assets, snmp: Arc<dyn SnmpClient>) -> Self {
        let actions = ActionHandler::new(Arc::clone(&config), snmp);
        Self {
            config,
            assets,
            actions,
        }
    }

    /// Register every open deck so an exit button closes all of them.
    pub fn with_open_decks(mut self, decks: Arc<[Arc<dyn DeckOperations>]>) -> Self {
        self.actions = self.actions.with_open_decks(decks);
        self
    }

    /// Visual style for `key` on `deck`.
    pub fn style_for(&self, deck: &dyn DeckOperations, key: u8, pressed: bool) -> KeyStyle {
        key_style(
            &self.assets,
            deck.key_count(),
            key,
            pressed,
            self.config.button(key),
        )
    }

    /// Render `key` and write it to the deck.
    pub fn update_key_image(&self, deck: &dyn DeckOperations, key: u8, pressed: bool) -> Result<()> {
        let style = self.style_for(deck, key, pressed);
        let image = render_style(deck.info(), &style)?;
        deck.set_key_image(key, &image)
    }

    /// Draw the released image on every key.
    pub fn render_all(&self, deck: &dyn DeckOperations) -> Result<()> {
        for key in 0..deck.key_count() {
            self.update_key_image(deck, key, false)?;
        }
        debug!(keys = deck.key_count(), "Rendered initial key images");
        Ok(())
    }

    /// Handle one transition and report what the action did, if any ran.
    pub fn dispatch(
        &self,
        deck: &dyn DeckOperations,
        key: u8,
        pressed: bool,
    ) -> Result<Option<ActionOutcome>> {
        if key >= deck.key_count() {
            trace!(key, "Ignoring event for key outside the deck");
            return Ok(None);
        }

        self.update_key_image(deck, key, pressed)?;

        if !pressed {
            return Ok(None);
        }
        match self.config.button(key) {
            Some(button) => self.actions.handle(deck, button).map(Some),
            None => Ok(None),
        }
    }
}

impl KeyEventHandler for Dispatcher {
    fn on_key_event(&self, deck: &dyn DeckOperations, key: u8, pressed: bool) -> Result<()> {
        if let Some(outcome) = self.dispatch(deck, key, pressed)? {
            debug!(key, ?outcome, "Key action finished");
        }
        Ok(())
    }
}
