//! Configuration module: the INI file describing devices and buttons.
//!
//! Loading happens once at startup; the resulting [`Config`] is read-only
//! and shared with the dispatcher.

mod loader;
mod model;
mod path;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, Diagnostic, LoadReport, parse_location};
pub use model::{
    Button, ButtonAction, Config, DEFAULT_SNMP_PORT, Device, SnmpAction, SnmpCommand, SnmpDevice,
    SnmpVersion, ValueType,
};
pub use path::{ASSETS_DIR_NAME, default_assets_dir, home_dir, require_file, resolve_path};
