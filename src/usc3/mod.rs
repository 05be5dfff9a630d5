//! USC-3 command layer.
//!
//! This module separates the concerns of talking to the marking controller:
//! - `encode`: translate Usc3Command → CRLF-terminated wire frame (pure, no I/O)
//! - `decode`: translate an LF-terminated reply → DecodedResponse (pure, no I/O)
//! - `pins`: output-mask and disable-flag bit packing (pure)
//! - `session`: own the serial port, write frames and read reply lines
//! - `discovery`: pick the controller's port out of the enumerated devices
//! - `client`: one method per controller command on top of all of the above

pub mod client;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod pins;
pub mod session;

pub use client::Usc3Client;
pub use decode::{decode, decode_with, parse_vector};
pub use discovery::{find_port, select_port, DeviceFilter};
pub use encode::{encode, encode_frame};
pub use pins::{disable_flag, output_mask};
pub use session::LineSession;

/// Status codes returned by the controller and their meaning.
/// Keys are compared against the reply token exactly, so "03" is not code 3.
pub const STATUS_TABLE: &[(u8, &str)] = &[
    (0, "Success"),
    (1, "Too many parameters"),
    (2, "Too few parameters"),
    (3, "Unknown command"),
    (4, "Job not valid"),
    (5, "Operation not allowed during marking"),
    (6, "Entity not found"),
    (7, "Not initialized"),
    (8, "Parameter out of range"),
    (9, "Internal error"),
    (10, "Operation not allowed"),
    (11, "The internal queue is full and cannot accept any more commands"),
    (12, "Command not available, probably due to missing Flash license"),
    (13, "Out of memory"),
    (14, "Job already exists"),
    (15, "File not found"),
    (16, "Command removed"),
    (17, "Wrong parameter type"),
    (18, "SN increment must be 0"),
];

/// A recognized controller status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code: u8,
    pub description: &'static str,
}

impl Status {
    /// Look up a reply token in the status table.
    pub fn from_token(token: &str) -> Option<Self> {
        STATUS_TABLE
            .iter()
            .find(|(code, _)| code.to_string() == token)
            .map(|&(code, description)| Status { code, description })
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Command parameter: nothing, one integer, or an ordered list of integers.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Param {
    Scalar(i64),
    Sequence(Vec<i64>),
}

/// Commands understood by the USC-3 controller and the attached laser source.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Usc3Command {
    // Jobs
    GetMarkTime,
    SaveJob,
    LoadJob,
    // Telemetry
    GetTemperature,
    // Home position, one value per axis
    GetHomePosition,
    SetHomePosition(Vec<i64>),
    // Digital / analog I/O
    GetDigitalOut,
    /// Output pin bit mask
    SetDigitalOut(u32),
    GetDigitalIn,
    /// Analog input address
    GetAnalogIn(u32),
    // Pulse outputs
    GetPulse,
    SetPulse {
        mask: u32,
        width_us: Option<u32>,
    },
    // Marking
    Run,
    Stop,
    GetLoopCount,
    SetLoopCount(u32),
    /// Pre-packed `FLAGS` word, see `pins::disable_flag`
    SetLaserDisableFlag(u32),
    // Laser source
    GetLaserStatus,
    EnableRs232Control,
    /// Pulse repetition rate in kHz
    SetPulseRate(u32),
    /// Output power in percent of maximum
    SetPower(u32),
    LaserOn,
    LaserOff,
}

impl Usc3Command {
    /// ASCII opcode sent at the start of the frame.
    pub fn opcode(&self) -> &'static str {
        use Usc3Command::*;
        match self {
            GetMarkTime => "GTI",
            SaveJob => "SVG",
            LoadJob => "LDG",
            GetTemperature => "GUT",
            GetHomePosition | SetHomePosition(_) => "HP",
            GetDigitalOut | SetDigitalOut(_) => "OOF",
            GetDigitalIn => "OIF",
            GetAnalogIn(_) => "AIN",
            GetPulse | SetPulse { .. } => "LPJ",
            Run | Stop => "M",
            GetLoopCount => "LC",
            SetLoopCount(_) => "AC",
            SetLaserDisableFlag(_) => "FLAGS",
            GetLaserStatus => "GSTA",
            EnableRs232Control => "S_232",
            SetPulseRate(_) => "PRR",
            SetPower(_) => "POW",
            LaserOn => "NUQON",
            LaserOff => "NUQOFF",
        }
    }

    /// Parameter carried after the opcode, if any.
    pub fn param(&self) -> Option<Param> {
        use Usc3Command::*;
        match self {
            GetMarkTime => Some(Param::Scalar(0)),
            SetHomePosition(axes) => Some(Param::Sequence(axes.clone())),
            SetDigitalOut(mask) => Some(Param::Scalar(i64::from(*mask))),
            GetAnalogIn(address) => Some(Param::Scalar(i64::from(*address))),
            SetPulse { mask, width_us: None } => Some(Param::Scalar(i64::from(*mask))),
            SetPulse {
                mask,
                width_us: Some(width),
            } => Some(Param::Sequence(vec![i64::from(*mask), i64::from(*width)])),
            Run => Some(Param::Scalar(1)),
            Stop => Some(Param::Scalar(0)),
            SetLoopCount(n) => Some(Param::Scalar(i64::from(*n))),
            SetLaserDisableFlag(word) => Some(Param::Scalar(i64::from(*word))),
            SetPulseRate(khz) => Some(Param::Scalar(i64::from(*khz))),
            SetPower(percent) => Some(Param::Scalar(i64::from(*percent))),
            SaveJob | LoadJob | GetTemperature | GetHomePosition | GetDigitalOut
            | GetDigitalIn | GetPulse | GetLoopCount | GetLaserStatus | EnableRs232Control
            | LaserOn | LaserOff => None,
        }
    }
}

/// A reply line after decoding.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DecodedResponse {
    /// The reply was a known status code
    Status(Status),
    /// Anything else, terminator removed, for the caller to parse
    Raw(Vec<u8>),
}

impl DecodedResponse {
    /// Status description, if this reply was a status code.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            DecodedResponse::Status(status) => Some(status.description),
            DecodedResponse::Raw(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DecodedResponse::Status(s) if s.is_success())
    }
}

/// How decode treats numeric tokens missing from the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Pass them through as raw data
    #[default]
    Permissive,
    /// Reject them with `Usc3Error::UnrecognizedStatus`
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table_covers_zero_to_eighteen() {
        assert_eq!(STATUS_TABLE.len(), 19);
        for (i, (code, _)) in STATUS_TABLE.iter().enumerate() {
            assert_eq!(*code as usize, i);
        }
    }

    #[test]
    fn status_lookup_is_exact() {
        assert_eq!(Status::from_token("3").unwrap().description, "Unknown command");
        assert!(Status::from_token("03").is_none());
        assert!(Status::from_token("19").is_none());
        assert!(Status::from_token(" 3").is_none());
    }

    #[test]
    fn run_and_stop_share_opcode() {
        assert_eq!(Usc3Command::Run.opcode(), "M");
        assert_eq!(Usc3Command::Stop.opcode(), "M");
        assert_eq!(Usc3Command::Run.param(), Some(Param::Scalar(1)));
        assert_eq!(Usc3Command::Stop.param(), Some(Param::Scalar(0)));
    }

    #[test]
    fn pulse_width_turns_param_into_sequence() {
        let plain = Usc3Command::SetPulse { mask: 5, width_us: None };
        let timed = Usc3Command::SetPulse { mask: 5, width_us: Some(200) };
        assert_eq!(plain.param(), Some(Param::Scalar(5)));
        assert_eq!(timed.param(), Some(Param::Sequence(vec![5, 200])));
    }
}
