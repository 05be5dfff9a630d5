//! Core domain types
//!
//! Pure types with no I/O dependencies: errors, device identities,
//! pin trigger modes and controller profiles.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
