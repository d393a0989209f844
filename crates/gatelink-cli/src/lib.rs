//! Command-line tooling for gatelink hardware descriptors.
//!
//! The `gatelink` binary loads a descriptor file, assembles its driver item
//! and either prints a summary of it or runs one value through its read or
//! write path. Everything except argument parsing and logging setup lives
//! here so it can be tested without spawning the binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gatelink_core::{Value, coerce};
use gatelink_driver::{DiagnosticCounter, DiagnosticKind, DriverItem, HardwareDescriptor};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default log filter when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Inspect hardware descriptors and translate values through them.
#[derive(Parser, Debug)]
#[command(name = "gatelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,

    /// Log filter, e.g. `debug` or `gatelink_driver=trace` (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the driver item assembled from a descriptor.
    Inspect {
        /// Path to the descriptor JSON file.
        descriptor: PathBuf,
    },
    /// Decode a raw device value on the read path.
    Decode {
        /// Path to the descriptor JSON file.
        descriptor: PathBuf,
        /// Value as a JSON scalar (`1`, `21.5`, `true`, `"OPEN"`) or a bare token.
        value: String,
    },
    /// Encode an application value on the write path.
    Encode {
        /// Path to the descriptor JSON file.
        descriptor: PathBuf,
        /// Value as a JSON scalar (`1`, `21.5`, `true`, `"OPEN"`) or a bare token.
        value: String,
    },
}

/// Load a descriptor file and assemble its driver item.
///
/// # Errors
/// Fails if the file cannot be opened, is not a valid descriptor, or lacks
/// the frame field its mode requires.
pub fn load_item(path: &Path, counter: &DiagnosticCounter) -> Result<DriverItem> {
    let file = File::open(path)
        .with_context(|| format!("unable to open the descriptor {}", path.display()))?;
    let descriptor = HardwareDescriptor::from_reader(BufReader::new(file))
        .with_context(|| format!("unable to read the descriptor {}", path.display()))?;
    let item = DriverItem::assemble_with(descriptor, counter).with_context(|| {
        format!(
            "fail to generate a driver item from the descriptor {}",
            path.display()
        )
    })?;

    info!(path = %path.display(), item_type = item.item_type(), "Driver item loaded");
    Ok(item)
}

/// Parse a command-line value.
///
/// JSON scalars keep their JSON type, so `1` is an integer as a live reading
/// would be. Anything else is coerced like a descriptor token.
#[must_use]
pub fn parse_value(arg: &str) -> Value {
    serde_json::from_str::<Value>(arg).unwrap_or_else(|_| coerce(arg))
}

/// Human-readable summary of a driver item.
#[must_use]
pub fn summarize(item: &DriverItem) -> String {
    let item_type = if item.item_type().is_empty() {
        "-"
    } else {
        item.item_type()
    };
    let mode = if item.is_sensor() { "sensor" } else { "actuator" };
    let frequency = item
        .frequency()
        .map_or_else(|| "-".to_string(), |f| f.to_string());

    let mut out = format!("type:      {item_type}\nmode:      {mode}\n");
    for (label, path) in [("read:", item.read()), ("write:", item.write())] {
        let rule = path.rule();
        let identity = if rule.is_identity() { " (identity)" } else { "" };
        out.push_str(&format!(
            "{label:<10} field={} coefficient={} entries={}{identity}\n",
            path.field(),
            rule.coefficient(),
            rule.table().len(),
        ));
    }
    out.push_str(&format!("frequency: {frequency}\n"));
    out.push_str(&format!("pairing:   {}", item.pairing_needed()));
    out
}

fn degraded_report(counter: &DiagnosticCounter) -> String {
    let kinds = [
        DiagnosticKind::MalformedTuple,
        DiagnosticKind::LookupMiss,
        DiagnosticKind::UnsupportedScaling,
    ];
    kinds
        .iter()
        .filter(|kind| counter.count(**kind) > 0)
        .map(|kind| format!("{kind}={}", counter.count(*kind)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Execute a command and return what it prints.
///
/// # Errors
/// Fails when the descriptor cannot be loaded.
pub fn run(command: &Command) -> Result<String> {
    let counter = DiagnosticCounter::new();

    let output = match command {
        Command::Inspect { descriptor } => summarize(&load_item(descriptor, &counter)?),
        Command::Decode { descriptor, value } => {
            let item = load_item(descriptor, &counter)?;
            serde_json::to_string(&item.decode_with(parse_value(value), &counter))?
        }
        Command::Encode { descriptor, value } => {
            let item = load_item(descriptor, &counter)?;
            serde_json::to_string(&item.encode_with(parse_value(value), &counter))?
        }
    };

    if counter.total() == 0 {
        Ok(output)
    } else {
        Ok(format!("{output}\ndegraded: {}", degraded_report(&counter)))
    }
}
