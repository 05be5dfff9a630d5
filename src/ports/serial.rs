//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory`: static methods for enumerating and opening ports
//! - `SerialConnection`: instance methods for reading/writing data

use crate::domain::{DeviceIdentity, Usc3Result};

/// Factory for creating serial connections.
/// Static methods only: discovery and client construction are generic over it,
/// so tests can swap in a fake device list without any hardware.
pub trait SerialFactory {
    /// List serial devices currently visible to the host, in enumeration order
    fn list_ports() -> Usc3Result<Vec<DeviceIdentity>>;

    /// Open a serial port at the given baud rate (8N1), returning a boxed connection
    fn open(port: &str, baud_rate: u32) -> Usc3Result<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
/// Only requires `Send` (not `Sync`): one owner at a time.
pub trait SerialConnection: Send {
    /// Write bytes to the port
    fn write(&mut self, data: &[u8]) -> Usc3Result<usize>;

    /// Read bytes from the port.
    ///
    /// Returns `Ok(0)` when the underlying read timed out with nothing available.
    fn read(&mut self, buffer: &mut [u8]) -> Usc3Result<usize>;

    /// Close the connection
    fn close(&mut self) -> Usc3Result<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
