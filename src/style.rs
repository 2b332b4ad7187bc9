//! Visual state of a key: which icon, font and label to render.
//!
//! The style is a pure function of the key index, the pressed flag and the
//! button configured at that index.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Button;

/// Bundled icon for the exit key.
pub const EXIT_ICON: &str = "Exit.png";
/// Bundled icon for unconfigured keys while pressed.
pub const PRESSED_ICON: &str = "Pressed.png";
/// Bundled icon for unconfigured keys while released.
pub const RELEASED_ICON: &str = "Released.png";
/// Bundled label font.
pub const FONT_FILE: &str = "DejaVuSans.ttf";

/// Which base style a key uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleName {
    /// The reserved highest-numbered key.
    Exit,
    /// Every other key.
    Emoji,
}

/// Inputs for rendering one key image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStyle {
    pub name: StyleName,
    pub icon: PathBuf,
    pub font: PathBuf,
    pub label: String,
}

/// Location of the bundled icons and font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    dir: PathBuf,
}

impl Assets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn font(&self) -> PathBuf {
        self.path(FONT_FILE)
    }
}

/// Index of the reserved exit key on a deck with `key_count` keys.
pub const fn exit_key_index(key_count: u8) -> Option<u8> {
    key_count.checked_sub(1)
}

/// Base style for a key, before any button overrides.
pub fn base_style(assets: &Assets, key_count: u8, key: u8, pressed: bool) -> KeyStyle {
    if exit_key_index(key_count) == Some(key) {
        KeyStyle {
            name: StyleName::Exit,
            icon: assets.path(EXIT_ICON),
            font: assets.font(),
            label: if pressed { "Bye" } else { "Exit" }.to_string(),
        }
    } else {
        KeyStyle {
            name: StyleName::Emoji,
            icon: assets.path(if pressed { PRESSED_ICON } else { RELEASED_ICON }),
            font: assets.font(),
            label: if pressed {
                "Pressed!".to_string()
            } else {
                format!("Key {key}")
            },
        }
    }
}

/// Style for a key with the configured button applied.
///
/// A button replaces the label and, when it has one, the icon. The reserved
/// exit key keeps its own look whatever is configured there.
pub fn key_style(
    assets: &Assets,
    key_count: u8,
    key: u8,
    pressed: bool,
    button: Option<&Button>,
) -> KeyStyle {
    let mut style = base_style(assets, key_count, key, pressed);
    if style.name == StyleName::Exit {
        return style;
    }
    if let Some(button) = button {
        if let Some(icon) = &button.icon {
            style.icon.clone_from(icon);
        }
        style.label.clone_from(&button.label);
    }
    style
}
