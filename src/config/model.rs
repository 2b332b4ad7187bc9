//! In-memory tables built from the configuration file.
//!
//! Devices are keyed by section name, buttons by zero-based key index. Both
//! tables are built once by the loader and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Default UDP port for SNMP agents.
pub const DEFAULT_SNMP_PORT: u16 = 161;

/// A named external target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Device {
    Snmp(SnmpDevice),
}

impl Device {
    /// Section name the device was declared under.
    pub fn name(&self) -> &str {
        match self {
            Self::Snmp(device) => &device.name,
        }
    }
}

/// Connection parameters for an SNMP agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnmpDevice {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub community: String,
    pub version: SnmpVersion,
}

/// SNMP protocol version as written in the `version` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V1,
    V2c,
    /// Anything else, kept verbatim.
    Other(String),
}

impl SnmpVersion {
    /// Parse `1`, `v1`, `2`, `2c` or `v2c`; other values are kept as written.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "v1" => Self::V1,
            "2" | "2c" | "v2" | "v2c" => Self::V2c,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("1"),
            Self::V2c => f.write_str("2c"),
            Self::Other(version) => f.write_str(version),
        }
    }
}

/// A binding from a physical key to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// Section name, used in diagnostics.
    pub name: String,
    /// Zero-based key index (`location - 1`).
    pub key: u8,
    pub label: String,
    /// Resolved icon path, if the section has one.
    pub icon: Option<PathBuf>,
    pub action: ButtonAction,
}

impl Button {
    /// The 1-based location as written in the configuration file.
    pub fn location(&self) -> u16 {
        u16::from(self.key) + 1
    }
}

/// What a button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ButtonAction {
    Snmp(SnmpAction),
    Exit,
}

impl ButtonAction {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Snmp(_) => "snmp",
            Self::Exit => "exit",
        }
    }
}

/// Parameters of an `snmp` button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnmpAction {
    /// Name of the device section this button talks to.
    pub device: String,
    pub command: SnmpCommand,
    pub oid: String,
    pub value: String,
    pub value_type: ValueType,
}

/// The `command` key of an `snmp` button.
///
/// `get` and unknown commands are accepted at load time and reported as
/// unsupported when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpCommand {
    Get,
    Set,
    Other(String),
}

impl SnmpCommand {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "get" => Self::Get,
            "set" => Self::Set,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SnmpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("get"),
            Self::Set => f.write_str("set"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Wire type used to encode an SNMP SET value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Integer,
}

impl ValueType {
    /// `integer`, `int` and `number` select the integer encoding; anything
    /// else is a string.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "integer" | "int" | "number" => Self::Integer,
            _ => Self::String,
        }
    }
}

/// The loaded device and button tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    pub devices: BTreeMap<String, Device>,
    pub buttons: BTreeMap<u8, Button>,
}

impl Config {
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }

    pub fn button(&self, key: u8) -> Option<&Button> {
        self.buttons.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.buttons.is_empty()
    }
}
