//! Common test utilities.
//!
//! - `RecordingClient`: SNMP client that records requests instead of sending
//! - `write_config`: Temporary INI files
//! - `bundled_assets`: The repository's `Assets` directory
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use stroomer::action::snmp::{SetRequest, SnmpClient};
use stroomer::config::SnmpDevice;
use stroomer::error::Result;
use stroomer::style::Assets;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Records every SET instead of putting it on the wire.
#[derive(Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<(SnmpDevice, SetRequest)>>,
}

impl RecordingClient {
    pub fn requests(&self) -> Vec<(SnmpDevice, SetRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

impl SnmpClient for RecordingClient {
    fn set(&self, device: &SnmpDevice, request: &SetRequest) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push((device.clone(), request.clone()));
        Ok(())
    }
}

pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Assets")
}

pub fn bundled_assets() -> Assets {
    Assets::new(assets_dir())
}

/// Write `content` to `stroomer.ini` in a fresh temp dir.
///
/// The dir must outlive the returned path.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stroomer.ini");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

pub const PRINTER_CONFIG: &str = "\
[printer1]
type = device
device_type = snmp
host = 10.0.0.5
community = public
version = 2c

[lights]
type = button
button_type = snmp
location = 3
label = Lights
device = printer1
command = set
oid = 1.3.6.1.2.1.1.5.0
value = ON
value_type = string
";

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
