//! INI configuration loader.
//!
//! Every section describes either a device or a button. Problems with one
//! section are reported as [`Diagnostic`]s and only that section is skipped;
//! the rest of the file still loads.
//!
//! ```ini
//! [printer1]
//! type = device
//! device_type = snmp
//! host = 10.0.0.5
//! community = public
//! version = 2c
//!
//! [lights]
//! type = button
//! button_type = snmp
//! location = 3
//! label = Lights
//! device = printer1
//! command = set
//! oid = 1.3.6.1.2.1.1.5.0
//! value = ON
//! value_type = string
//! icon = Lamp.png
//! ```

use std::collections::btree_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};

use super::model::{
    Button, ButtonAction, Config, DEFAULT_SNMP_PORT, Device, SnmpAction, SnmpCommand, SnmpDevice,
    SnmpVersion, ValueType,
};
use super::path::resolve_path;
use crate::error::{Result, StroomerError};
use crate::style::EXIT_ICON;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "stroomer.ini";

/// Section whose entries act as fallbacks for every other section.
const DEFAULTS_SECTION: &str = "DEFAULT";

/// Section name that may appear without a `type` and is silently ignored.
const RESERVED_SECTION: &str = "default";

/// A problem found in one configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MissingType {
        section: String,
    },
    UnsupportedDeviceType {
        section: String,
        device_type: String,
    },
    UnsupportedButtonType {
        section: String,
        button_type: String,
    },
    /// `type` is present but neither `device` nor `button`.
    UnhandledSection {
        section: String,
        section_type: String,
        entries: Vec<(String, String)>,
    },
    MissingField {
        section: String,
        field: String,
    },
    InvalidValue {
        section: String,
        field: String,
        value: String,
    },
    DuplicateLocation {
        section: String,
        previous: String,
        location: u16,
    },
}

impl Diagnostic {
    pub fn section(&self) -> &str {
        match self {
            Self::MissingType { section }
            | Self::UnsupportedDeviceType { section, .. }
            | Self::UnsupportedButtonType { section, .. }
            | Self::UnhandledSection { section, .. }
            | Self::MissingField { section, .. }
            | Self::InvalidValue { section, .. }
            | Self::DuplicateLocation { section, .. } => section,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingType { section } => write!(f, "Missing type in section {section}"),
            Self::UnsupportedDeviceType {
                section,
                device_type,
            } => write!(f, "Unsupported device {section} of type {device_type}"),
            Self::UnsupportedButtonType {
                section,
                button_type,
            } => write!(f, "Unsupported button {section} of type {button_type}"),
            Self::UnhandledSection {
                section,
                section_type,
                entries,
            } => {
                write!(f, "Section {section} has unhandled type {section_type}:")?;
                for (key, value) in entries {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
            Self::MissingField { section, field } => {
                write!(f, "Section {section} is missing required key '{field}'")
            }
            Self::InvalidValue {
                section,
                field,
                value,
            } => write!(f, "Section {section} has invalid {field} '{value}'"),
            Self::DuplicateLocation {
                section,
                previous,
                location,
            } => write!(
                f,
                "Section {section} reuses location {location} of section {previous}; {section} wins"
            ),
        }
    }
}

/// Result of loading a configuration: the tables plus every diagnostic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub config: Config,
    pub diagnostics: Vec<Diagnostic>,
}

/// One section with lower-cased keys and `[DEFAULT]` fallbacks applied.
struct Section<'a> {
    name: &'a str,
    entries: Vec<(String, String)>,
}

impl<'a> Section<'a> {
    fn new(name: &'a str, own: &ini::Properties, defaults: &[(String, String)]) -> Self {
        let mut entries: Vec<(String, String)> = own
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        for (key, value) in defaults {
            if !entries.iter().any(|(k, _)| k == key) {
                entries.push((key.clone(), value.clone()));
            }
        }
        Self { name, entries }
    }

    fn get(&self, key: &str) -> Option<&str> {
        // Later duplicates win, as with configparser.
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &str) -> std::result::Result<&str, Diagnostic> {
        self.get(key).ok_or_else(|| Diagnostic::MissingField {
            section: self.name.to_string(),
            field: key.to_string(),
        })
    }

    fn invalid(&self, field: &str, value: &str) -> Diagnostic {
        Diagnostic::InvalidValue {
            section: self.name.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Builds [`Config`] tables from INI text.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    assets_dir: PathBuf,
}

impl ConfigLoader {
    /// Icons in button sections resolve relative to `assets_dir`.
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Fails only when the file cannot be read or is not valid INI; problems
    /// inside sections become diagnostics.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        info!("Loading configuration file");

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StroomerError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                StroomerError::Io(e)
            }
        })?;
        debug!(bytes = content.len(), "Read config file");

        self.load_str(&content)
    }

    /// Load a configuration from INI text.
    pub fn load_str(&self, content: &str) -> Result<LoadReport> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, opt)
            .map_err(|e| StroomerError::ConfigParse(e.to_string()))?;
        Ok(self.load_ini(&ini))
    }

    /// Build the tables from parsed INI sections.
    pub fn load_ini(&self, ini: &Ini) -> LoadReport {
        let defaults: Vec<(String, String)> = ini
            .section(Some(DEFAULTS_SECTION))
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let mut report = LoadReport::default();

        for (name, props) in ini.iter() {
            let Some(name) = name else { continue };
            if name == DEFAULTS_SECTION {
                continue;
            }
            let section = Section::new(name, props, &defaults);
            if let Err(diagnostic) = self.load_section(&section, &mut report.config) {
                warn!(section = name, "{diagnostic}");
                report.diagnostics.push(diagnostic);
            }
        }

        info!(
            devices = report.config.devices.len(),
            buttons = report.config.buttons.len(),
            diagnostics = report.diagnostics.len(),
            "Configuration loaded"
        );
        report
    }

    fn load_section(
        &self,
        section: &Section<'_>,
        config: &mut Config,
    ) -> std::result::Result<(), Diagnostic> {
        match section.get("type") {
            Some("device") => Self::add_device(section, config),
            Some("button") => self.add_button(section, config),
            Some(other) => Err(Diagnostic::UnhandledSection {
                section: section.name.to_string(),
                section_type: other.to_string(),
                entries: section.entries.clone(),
            }),
            None if section.name == RESERVED_SECTION => {
                trace!(section = section.name, "Skipping reserved section");
                Ok(())
            }
            None => Err(Diagnostic::MissingType {
                section: section.name.to_string(),
            }),
        }
    }

    fn add_device(section: &Section<'_>, config: &mut Config) -> std::result::Result<(), Diagnostic> {
        let device_type = section.require("device_type")?;
        let device = match device_type {
            "snmp" => Device::Snmp(Self::snmp_device(section)?),
            other => {
                return Err(Diagnostic::UnsupportedDeviceType {
                    section: section.name.to_string(),
                    device_type: other.to_string(),
                });
            }
        };

        debug!(section = section.name, device_type, "Added device");
        config.devices.insert(section.name.to_string(), device);
        Ok(())
    }

    fn snmp_device(section: &Section<'_>) -> std::result::Result<SnmpDevice, Diagnostic> {
        let host = section.require("host")?;
        let community = section.require("community")?;
        let version = SnmpVersion::parse(section.require("version")?);
        let port = match section.get("port") {
            Some(p) => p.parse::<u16>().map_err(|_| section.invalid("port", p))?,
            None => DEFAULT_SNMP_PORT,
        };

        Ok(SnmpDevice {
            name: section.name.to_string(),
            host: host.to_string(),
            port,
            community: community.to_string(),
            version,
        })
    }

    fn add_button(
        &self,
        section: &Section<'_>,
        config: &mut Config,
    ) -> std::result::Result<(), Diagnostic> {
        let button_type = section.require("button_type")?;
        let button = match button_type {
            "snmp" => self.snmp_button(section)?,
            "exit" => self.exit_button(section)?,
            other => {
                return Err(Diagnostic::UnsupportedButtonType {
                    section: section.name.to_string(),
                    button_type: other.to_string(),
                });
            }
        };

        debug!(
            section = section.name,
            button_type,
            key = button.key,
            "Added button"
        );

        match config.buttons.entry(button.key) {
            Entry::Occupied(mut slot) => {
                let diagnostic = Diagnostic::DuplicateLocation {
                    section: section.name.to_string(),
                    previous: slot.get().name.clone(),
                    location: button.location(),
                };
                slot.insert(button);
                Err(diagnostic)
            }
            Entry::Vacant(slot) => {
                slot.insert(button);
                Ok(())
            }
        }
    }

    fn snmp_button(&self, section: &Section<'_>) -> std::result::Result<Button, Diagnostic> {
        let key = Self::key_index(section)?;
        let label = section.require("label")?;
        let action = SnmpAction {
            device: section.require("device")?.to_string(),
            command: SnmpCommand::parse(section.require("command")?),
            oid: section.require("oid")?.to_string(),
            value: section.require("value")?.to_string(),
            value_type: section.get("value_type").map(ValueType::parse).unwrap_or_default(),
        };
        let icon = section
            .get("icon")
            .map(|icon| self.resolve_icon(section, icon))
            .transpose()?;

        Ok(Button {
            name: section.name.to_string(),
            key,
            label: label.to_string(),
            icon,
            action: ButtonAction::Snmp(action),
        })
    }

    fn exit_button(&self, section: &Section<'_>) -> std::result::Result<Button, Diagnostic> {
        let key = Self::key_index(section)?;
        let label = section.require("label")?;
        let icon = self.resolve_icon(section, section.get("icon").unwrap_or(EXIT_ICON))?;

        Ok(Button {
            name: section.name.to_string(),
            key,
            label: label.to_string(),
            icon: Some(icon),
            action: ButtonAction::Exit,
        })
    }

    /// Convert the 1-based `location` into a key index.
    fn key_index(section: &Section<'_>) -> std::result::Result<u8, Diagnostic> {
        let location = section.require("location")?;
        parse_location(location).ok_or_else(|| section.invalid("location", location))
    }

    fn resolve_icon(
        &self,
        section: &Section<'_>,
        icon: &str,
    ) -> std::result::Result<PathBuf, Diagnostic> {
        resolve_path(Path::new(icon), &self.assets_dir).map_err(|_| section.invalid("icon", icon))
    }
}

/// Parse a 1-based key location into a 0-based index.
pub fn parse_location(s: &str) -> Option<u8> {
    let location: u16 = s.trim().parse().ok()?;
    location.checked_sub(1).and_then(|i| u8::try_from(i).ok())
}
