//! Loads the printer roster.
//!
//! The roster is a JSON document with a `printers` array:
//!
//! ```json
//! {
//!     "printers": [
//!         { "id": 1, "name": "left", "host": "192.168.1.20", "serial": "01P00A000000001",
//!           "access_code": "12345678" }
//!     ]
//! }
//! ```
//!
//! `name` defaults to `printer-<id>` and `port` defaults to [DEFAULT_PORT]. Files ending in
//! `.yaml` or `.yml` are read as YAML with the same shape.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the roster is read from if `--config` isn't given.
pub const DEFAULT_CONFIG_PATH: &str = "printers.json";

/// The printers' MQTT-over-TLS port.
pub const DEFAULT_PORT: u16 = 8883;

/// A user-assigned printer identifier, unique within a roster.
pub type DeviceId = i64;

/// Identity and connection details for one printer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceEntry {
    pub id: DeviceId,

    /// Display label. Defaults to `printer-<id>`.
    pub name: String,

    /// Network address of the printer.
    pub host: String,

    /// The printer's serial number. Printers are addressed by serial on the control channel.
    pub serial: String,

    /// The LAN access code shown on the printer's screen.
    pub access_code: String,

    pub port: u16,
}

impl DeviceEntry {
    /// The topic that accepts commands for this printer.
    pub fn request_topic(&self) -> String {
        format!("device/{}/request", self.serial)
    }
}

/// The on-disk form of [DeviceEntry], before defaults are applied.
#[derive(Deserialize)]
struct RawEntry {
    id: DeviceId,
    #[serde(default)]
    name: Option<String>,
    host: String,
    serial: String,
    access_code: String,
    #[serde(default)]
    port: Option<u16>,
}

impl From<RawEntry> for DeviceEntry {
    fn from(raw: RawEntry) -> Self {
        DeviceEntry {
            name: raw.name.unwrap_or_else(|| format!("printer-{}", raw.id)),
            id: raw.id,
            host: raw.host,
            serial: raw.serial,
            access_code: raw.access_code,
            port: raw.port.unwrap_or(DEFAULT_PORT),
        }
    }
}

#[derive(Deserialize)]
struct RawRoster {
    #[serde(default)]
    printers: Vec<RawEntry>,
}

/// The ordered list of printers from a roster file.
///
/// Order is preserved from the source file. IDs are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<DeviceEntry>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate IDs.
    pub fn new(entries: Vec<DeviceEntry>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(ConfigError::DuplicateId { id: entry.id });
            }
        }
        Ok(Roster { entries })
    }

    pub fn entries(&self) -> &[DeviceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a printer by ID.
    pub fn get(&self, id: DeviceId) -> Option<&DeviceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// Reads and parses the roster file at `path`.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_owned(),
        },
        _ => ConfigError::Read {
            path: path.to_owned(),
            source,
        },
    })?;

    let raw = parse(path, &contents)?;
    let roster = Roster::new(raw.printers.into_iter().map(DeviceEntry::from).collect())?;
    tracing::debug!(path = %path.display(), printers = roster.entries.len(), "loaded roster");
    Ok(roster)
}

fn parse(path: &Path, contents: &str) -> Result<RawRoster, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        path: PathBuf::from(path),
        message,
    };

    if is_yaml(path) {
        serde_yaml::from_str(contents).map_err(|err| parse_error(err.to_string()))
    } else {
        serde_json::from_str(contents).map_err(|err| parse_error(err.to_string()))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml"),
    )
}
