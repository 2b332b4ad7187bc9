//! stroomer - map Stream Deck keys to SNMP commands.
//!
//! Keys are configured in an INI file as buttons bound to devices. Each key
//! shows an icon with a label; pressing a button key sends an SNMP SET to its
//! device, and an `exit` button resets and closes the deck.
//!
//! # Modules
//!
//! - `config`: INI loading into device and button tables
//! - `style`: Which icon, font and label a key shows
//! - `render`: Key image rendering
//! - `dispatch`: Key event handling
//! - `action`: Button actions (SNMP SET, exit)
//! - `device`: Deck abstraction, real and mock, plus the input watcher
//! - `error`: Error types
//! - `logging`: Tracing subscriber setup
#![forbid(unsafe_code)]

pub mod action;
pub mod cli;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod render;
pub mod style;
