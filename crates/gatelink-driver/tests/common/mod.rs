//! Shared helpers for driver integration tests.

#![allow(dead_code)]

use gatelink_driver::{DiagnosticLog, DriverItem, HardwareDescriptor};
use std::path::PathBuf;

/// Path of a descriptor fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load and parse a descriptor fixture.
pub fn load_descriptor(name: &str) -> HardwareDescriptor {
    let bytes = std::fs::read(fixture_path(name)).expect("fixture should be readable");
    HardwareDescriptor::from_json_slice(&bytes).expect("fixture should be a valid descriptor")
}

/// Assemble a driver item from a fixture, collecting diagnostics.
pub fn assemble_fixture(name: &str) -> (DriverItem, DiagnosticLog) {
    let log = DiagnosticLog::new();
    let item = DriverItem::assemble_with(load_descriptor(name), &log)
        .expect("fixture should assemble");
    (item, log)
}
