//! Integration tests for loading configuration files from disk.

use stroomer::config::{
    ButtonAction, ConfigLoader, Device, Diagnostic, SnmpCommand, SnmpVersion, ValueType,
};
use stroomer::error::StroomerError;

use crate::common::{PRINTER_CONFIG, assets_dir, write_config};

#[test]
fn test_load_printer_config_from_file() {
    let (_dir, path) = write_config(PRINTER_CONFIG);
    let report = ConfigLoader::new(assets_dir()).load_path(&path).unwrap();

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    let Some(Device::Snmp(device)) = report.config.device("printer1") else {
        panic!("printer1 not loaded");
    };
    assert_eq!(device.host, "10.0.0.5");
    assert_eq!(device.port, 161);
    assert_eq!(device.version, SnmpVersion::V2c);

    let button = report.config.button(2).expect("location 3 is key 2");
    assert_eq!(button.label, "Lights");
    assert_eq!(button.location(), 3);
    let ButtonAction::Snmp(action) = &button.action else {
        panic!("expected snmp action");
    };
    assert_eq!(action.command, SnmpCommand::Set);
    assert_eq!(action.value_type, ValueType::String);
}

#[test]
fn test_unrecognized_version_still_yields_device() {
    let (_dir, path) = write_config(&PRINTER_CONFIG.replace("version = 2c", "version = 3"));
    let report = ConfigLoader::new(assets_dir()).load_path(&path).unwrap();

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let Some(Device::Snmp(device)) = report.config.device("printer1") else {
        panic!("printer1 not loaded");
    };
    assert_eq!(device.version, SnmpVersion::Other("3".to_string()));
    assert_eq!(device.version.to_string(), "3");
}

#[test]
fn test_missing_file_is_config_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = ConfigLoader::new(assets_dir())
        .load_path(dir.path().join("absent.ini"))
        .unwrap_err();

    assert!(matches!(err, StroomerError::ConfigNotFound { .. }));
    assert!(err.suggestion().is_some());
}

#[test]
fn test_bad_sections_do_not_block_good_ones() {
    let (_dir, path) = write_config(
        "\
[printer1]
type = device
device_type = snmp
host = 10.0.0.5
community = public
version = 2c

[modem]
type = device
device_type = serial

[orphan]
label = nothing

[macro]
type = sequence
steps = 3

[quit]
type = button
button_type = exit
location = 15
label = Quit
",
    );
    let report = ConfigLoader::new(assets_dir()).load_path(&path).unwrap();

    assert_eq!(report.config.devices.len(), 1);
    assert_eq!(report.config.buttons.len(), 1);
    assert!(matches!(
        report.config.button(14).map(|b| &b.action),
        Some(ButtonAction::Exit)
    ));

    let sections: Vec<&str> = report.diagnostics.iter().map(Diagnostic::section).collect();
    assert_eq!(sections, vec!["modem", "orphan", "macro"]);
}

#[test]
fn test_exit_button_icon_defaults_to_bundled_exit() {
    let (_dir, path) = write_config(
        "\
[quit]
type = button
button_type = exit
location = 1
label = Quit
",
    );
    let report = ConfigLoader::new(assets_dir()).load_path(&path).unwrap();

    let icon = report.config.button(0).and_then(|b| b.icon.clone()).unwrap();
    assert_eq!(icon, assets_dir().join("Exit.png"));
    assert!(icon.is_file());
}

#[test]
fn test_report_serializes_to_json() {
    let (_dir, path) = write_config(PRINTER_CONFIG);
    let report = ConfigLoader::new(assets_dir()).load_path(&path).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["config"]["devices"]["printer1"].is_object());
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}
