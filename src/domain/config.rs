//! Controller configuration profiles
//!
//! A ControllerConfig is a JSON profile describing how to reach one
//! USC-3 board: explicit port or discovery criteria, line settings, and
//! decoding behaviour.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PortSelection, Usc3Error, Usc3Result};

/// Baud rate of the USC-3 RS-232 link (8N1)
pub const USC3_BAUD_RATE: u32 = 115_200;

/// USB vendor id reported by USC-3 interface boards
pub const USC3_VENDOR_ID: u16 = 0x2341;

fn default_baud_rate() -> u32 {
    USC3_BAUD_RATE
}

fn default_vendor_id() -> u16 {
    USC3_VENDOR_ID
}

/// A saved controller profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Profile name (e.g., "Default", "Bench Laser")
    pub name: String,
    /// Explicit port path; skips discovery when set
    #[serde(default)]
    pub port: Option<String>,
    /// Exact USB serial number to look for during discovery
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Vendor id matched when no serial number is given
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Upper bound on waiting for a response line; `None` waits forever
    #[serde(default)]
    pub response_timeout_ms: Option<u64>,
    #[serde(default)]
    pub port_selection: PortSelection,
    /// Reject bare numeric replies that are not known status codes
    #[serde(default)]
    pub strict_status: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            port: None,
            serial_number: None,
            vendor_id: USC3_VENDOR_ID,
            baud_rate: USC3_BAUD_RATE,
            response_timeout_ms: None,
            port_selection: PortSelection::Last,
            strict_status: false,
        }
    }
}

impl ControllerConfig {
    /// Load a profile from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Usc3Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Usc3Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            Usc3Error::Config(format!("Failed to parse config {}: {e}", path.display()))
        })?;
        log::info!("Loaded controller profile '{}' from {}", config.name, path.display());
        Ok(config)
    }
}
