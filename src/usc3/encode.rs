//! Pure encoding: Usc3Command → USC-3 wire frame.
//!
//! No I/O, no side effects. Frames are `OPCODE[ p0[ p1 ...]]\r\n` with
//! parameters rendered as plain decimal integers separated by single spaces.

use super::{Param, Usc3Command};

/// Command terminator
pub const TERMINATOR: &str = "\r\n";

/// Separator between opcode and parameters
pub const DELIMITER: char = ' ';

/// Build a frame from an opcode and an optional parameter.
pub fn encode_frame(opcode: &str, param: Option<&Param>) -> String {
    let mut frame = String::from(opcode);
    match param {
        None => {}
        Some(Param::Scalar(value)) => {
            frame.push(DELIMITER);
            frame.push_str(&value.to_string());
        }
        Some(Param::Sequence(values)) => {
            for value in values {
                frame.push(DELIMITER);
                frame.push_str(&value.to_string());
            }
        }
    }
    frame.push_str(TERMINATOR);
    frame
}

/// Encode a Usc3Command into its wire frame (including the CRLF terminator).
pub fn encode(cmd: &Usc3Command) -> String {
    encode_frame(cmd.opcode(), cmd.param().as_ref())
}
