//! Locate the controller's serial port among the enumerated devices.
//!
//! Selection rules:
//! - with a target serial number, only devices whose serial number is
//!   exactly equal qualify (case-sensitive, no prefix matching)
//! - otherwise, devices whose USB vendor id equals the configured one
//! - several matches resolve by `PortSelection`: the last in enumeration
//!   order, or an error when uniqueness is required

use crate::domain::{DeviceIdentity, PortSelection, Usc3Error, Usc3Result};
use crate::ports::SerialFactory;

/// Criteria for picking one device out of an enumeration.
#[derive(Debug, Clone, Copy)]
pub struct DeviceFilter<'a> {
    pub serial_number: Option<&'a str>,
    pub vendor_id: u16,
    pub selection: PortSelection,
}

impl DeviceFilter<'_> {
    fn matches(&self, device: &DeviceIdentity) -> bool {
        match self.serial_number {
            Some(target) => device.serial_number.as_deref() == Some(target),
            None => device.vendor_id == Some(self.vendor_id),
        }
    }

    fn describe(&self) -> String {
        match self.serial_number {
            Some(target) => format!("serial number '{target}'"),
            None => format!("vendor id {:04X}", self.vendor_id),
        }
    }
}

/// Pick a device from an already-enumerated list. No I/O.
pub fn select_port<'d>(
    devices: &'d [DeviceIdentity],
    filter: &DeviceFilter<'_>,
) -> Usc3Result<&'d DeviceIdentity> {
    let candidates: Vec<&DeviceIdentity> = devices.iter().filter(|d| filter.matches(d)).collect();

    match (candidates.as_slice(), filter.selection) {
        ([], _) => Err(Usc3Error::DeviceNotFound(format!(
            "no serial device with {} among {} ports",
            filter.describe(),
            devices.len()
        ))),
        ([only], _) => Ok(*only),
        (many, PortSelection::Unique) => Err(Usc3Error::AmbiguousDevice(format!(
            "{} devices match {}: {}",
            many.len(),
            filter.describe(),
            many.iter().map(|d| d.port.as_str()).collect::<Vec<_>>().join(", ")
        ))),
        ([.., last], PortSelection::Last) => {
            log::warn!(
                "{} devices match {}, using last enumerated ({})",
                candidates.len(),
                filter.describe(),
                last.port
            );
            Ok(*last)
        }
    }
}

/// Enumerate ports through `F` and return the path of the selected device.
/// Does not open anything.
pub fn find_port<F: SerialFactory>(filter: &DeviceFilter<'_>) -> Usc3Result<String> {
    let devices = F::list_ports()?;
    let device = select_port(&devices, filter)?;
    log::info!("USC-3 found on {} ({})", device.port, device.port_type);
    Ok(device.port.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VID: u16 = 0x2341;

    fn devices() -> Vec<DeviceIdentity> {
        vec![
            DeviceIdentity::usb("/dev/ttyACM0", VID, Some("85439303")),
            DeviceIdentity::usb("/dev/ttyUSB0", 0x0403, Some("A50285BI")),
            DeviceIdentity::usb("/dev/ttyACM1", VID, Some("95530343")),
            DeviceIdentity {
                port: "/dev/ttyS0".into(),
                vendor_id: None,
                serial_number: None,
                port_type: "Native".into(),
            },
        ]
    }

    fn by_vendor(selection: PortSelection) -> DeviceFilter<'static> {
        DeviceFilter {
            serial_number: None,
            vendor_id: VID,
            selection,
        }
    }

    fn by_serial(serial: &str) -> DeviceFilter<'_> {
        DeviceFilter {
            serial_number: Some(serial),
            vendor_id: VID,
            selection: PortSelection::Last,
        }
    }

    #[test]
    fn serial_number_match_is_exact() {
        let list = devices();
        assert_eq!(select_port(&list, &by_serial("A50285BI")).unwrap().port, "/dev/ttyUSB0");
        assert!(select_port(&list, &by_serial("a50285bi")).is_err());
        assert!(select_port(&list, &by_serial("A50285")).is_err());
    }

    #[test]
    fn serial_number_ignores_vendor_id() {
        let list = devices();
        let device = select_port(&list, &by_serial("A50285BI")).unwrap();
        assert_eq!(device.vendor_id, Some(0x0403));
    }

    #[test]
    fn vendor_match_takes_last_enumerated() {
        let list = devices();
        let device = select_port(&list, &by_vendor(PortSelection::Last)).unwrap();
        assert_eq!(device.port, "/dev/ttyACM1");
    }

    #[test]
    fn unique_selection_rejects_several_matches() {
        let list = devices();
        let err = select_port(&list, &by_vendor(PortSelection::Unique)).unwrap_err();
        assert!(matches!(err, Usc3Error::AmbiguousDevice(_)));
        assert!(err.to_string().contains("/dev/ttyACM0"));
    }

    #[test]
    fn unique_selection_accepts_single_match() {
        let list = vec![DeviceIdentity::usb("/dev/ttyACM3", VID, None)];
        let device = select_port(&list, &by_vendor(PortSelection::Unique)).unwrap();
        assert_eq!(device.port, "/dev/ttyACM3");
    }

    #[test]
    fn empty_enumeration_is_not_found() {
        assert!(matches!(
            select_port(&[], &by_vendor(PortSelection::Last)),
            Err(Usc3Error::DeviceNotFound(_))
        ));
    }

    #[test]
    fn devices_without_usb_metadata_never_match() {
        let list = vec![DeviceIdentity {
            port: "/dev/ttyS0".into(),
            vendor_id: None,
            serial_number: None,
            port_type: "Native".into(),
        }];
        assert!(select_port(&list, &by_vendor(PortSelection::Last)).is_err());
        assert!(select_port(&list, &by_serial("")).is_err());
    }
}
