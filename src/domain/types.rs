//! Core domain types

use serde::{Deserialize, Serialize};

/// A serial device as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Port path, e.g. `/dev/ttyACM0` or `COM3`
    pub port: String,
    /// USB vendor id, `None` for non-USB ports
    pub vendor_id: Option<u16>,
    /// USB device serial number, if the device reports one
    pub serial_number: Option<String>,
    /// Human-readable port kind ("USB (2341:0043)", "PCI", ...)
    pub port_type: String,
}

impl DeviceIdentity {
    /// Convenience constructor for a USB device.
    pub fn usb(port: &str, vendor_id: u16, serial_number: Option<&str>) -> Self {
        Self {
            port: port.to_string(),
            vendor_id: Some(vendor_id),
            serial_number: serial_number.map(String::from),
            port_type: "USB".to_string(),
        }
    }
}

/// How an input pin event is recognized by the laser-disable flag.
///
/// The discriminant is the value added to the pin number in the `FLAGS` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    Level = 0x00,
    Edge = 0x10,
}

impl TriggerMode {
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Tie-break applied when more than one enumerated device matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSelection {
    /// Take the last match in enumeration order
    #[default]
    Last,
    /// Fail unless exactly one device matches
    Unique,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_mode_bits() {
        assert_eq!(TriggerMode::Level.bits(), 0x00);
        assert_eq!(TriggerMode::Edge.bits(), 0x10);
    }

    #[test]
    fn port_selection_serializes_lowercase() {
        let json = serde_json::to_string(&PortSelection::Unique).unwrap();
        assert_eq!(json, "\"unique\"");
        assert_eq!(PortSelection::default(), PortSelection::Last);
    }
}
