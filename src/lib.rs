//! USC-3 Laser Marking Controller Client
//!
//! Talks to a SCAPS USC-3 board (and the NuQ laser source behind it) over an
//! RS-232 link: finds the port, frames ASCII commands, reads reply lines and
//! maps status codes to descriptions.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions for the serial byte stream and enumeration
//! - `usc3/` - Protocol logic (encode, decode, pins, session, discovery, client)
//! - `adapters/` - Implementations of ports (serialport, in-memory mock)

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;
pub mod usc3;

// Adapters (external I/O)
pub mod adapters;

pub use domain::{ControllerConfig, Usc3Error, Usc3Result};
pub use usc3::{DecodedResponse, Usc3Client, Usc3Command};
