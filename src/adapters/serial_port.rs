//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.
//! `SerialPortFactory` has no instance data, just static methods for
//! enumerating and opening ports.

use std::io::ErrorKind;
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPortType, StopBits};

use crate::domain::{DeviceIdentity, Usc3Error, Usc3Result};
use crate::ports::{SerialConnection, SerialFactory};

/// Per-read timeout. Timeouts surface as zero-byte reads so the line
/// session decides how long to keep waiting.
const READ_TIMEOUT_MS: u64 = 100;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> Usc3Result<Vec<DeviceIdentity>> {
        let ports = serialport::available_ports()
            .map_err(|e| Usc3Error::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let (vendor_id, serial_number, port_type) = match p.port_type {
                    SerialPortType::UsbPort(info) => (
                        Some(info.vid),
                        info.serial_number,
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid),
                    ),
                    SerialPortType::PciPort => (None, None, "PCI".to_string()),
                    SerialPortType::BluetoothPort => (None, None, "Bluetooth".to_string()),
                    SerialPortType::Unknown => (None, None, "Native".to_string()),
                };
                DeviceIdentity {
                    port: p.port_name,
                    vendor_id,
                    serial_number,
                    port_type,
                }
            })
            .collect())
    }

    fn open(port: &str, baud_rate: u32) -> Usc3Result<Box<dyn SerialConnection>> {
        let serial = serialport::new(port, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()
            .map_err(|e| Usc3Error::Serial(format!("Failed to open {port}: {e}")))?;

        Ok(Box::new(SerialPortConnection::from_port(serial)))
    }
}

/// An open serial port connection wrapping the `serialport` crate.
///
/// `close` drops the OS handle; later writes and reads fail.
pub struct SerialPortConnection {
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialPortConnection {
    pub fn from_port(port: Box<dyn serialport::SerialPort>) -> Self {
        Self { port: Some(port) }
    }

    fn open_port(&mut self) -> Usc3Result<&mut Box<dyn serialport::SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| Usc3Error::Serial("port closed".to_string()))
    }
}

impl SerialConnection for SerialPortConnection {
    fn write(&mut self, data: &[u8]) -> Usc3Result<usize> {
        use std::io::Write;
        self.open_port()?
            .write_all(data)
            .map_err(|e| Usc3Error::Serial(format!("Write failed: {e}")))?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Usc3Result<usize> {
        use std::io::Read;
        match self.open_port()?.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(Usc3Error::Serial(format!("Read failed: {e}"))),
        }
    }

    fn close(&mut self) -> Usc3Result<()> {
        if let Some(port) = self.port.take() {
            log::debug!("Closing {}", port.name().unwrap_or_default());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serialport::TTYPort;

    #[test]
    fn closed_connection_releases_port_and_rejects_io() {
        let (master, _slave) = TTYPort::pair().expect("pseudo-terminal pair");
        let mut conn = SerialPortConnection::from_port(Box::new(master));
        assert!(conn.is_connected());
        assert_eq!(conn.write(b"M 0\r\n").unwrap(), 5);

        conn.close().unwrap();
        assert!(!conn.is_connected());
        assert!(conn.port.is_none());

        let err = conn.write(b"M 1\r\n").unwrap_err();
        assert!(err.to_string().contains("port closed"), "{err}");
        let mut buf = [0u8; 8];
        assert!(matches!(conn.read(&mut buf), Err(Usc3Error::Serial(_))));

        // Closing twice is harmless
        conn.close().unwrap();
    }
}
