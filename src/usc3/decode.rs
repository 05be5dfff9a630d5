//! Pure decoding: reply line → DecodedResponse.
//!
//! No I/O, no side effects. A reply is either a status code from
//! `STATUS_TABLE` or an opaque payload (temperature, position vector, ...)
//! that the caller parses for the command it sent.

use crate::domain::{Usc3Error, Usc3Result};

use super::{DecodeMode, DecodedResponse, Status};

/// Reply terminator
pub const LINE_END: u8 = b'\n';

/// Remove the trailing LF and, if the device sent one, the CR before it.
pub fn strip_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(&[LINE_END]).unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Decode a reply line in permissive mode. Never fails: anything that is
/// not an exact status-table key comes back as `Raw`.
pub fn decode(raw: &[u8]) -> DecodedResponse {
    let payload = strip_terminator(raw);
    match std::str::from_utf8(payload).ok().and_then(Status::from_token) {
        Some(status) => DecodedResponse::Status(status),
        None => DecodedResponse::Raw(payload.to_vec()),
    }
}

/// Decode a reply line with the given mode.
///
/// In strict mode a bare integer that is not a known status code is an
/// error instead of raw data.
pub fn decode_with(raw: &[u8], mode: DecodeMode) -> Usc3Result<DecodedResponse> {
    let decoded = decode(raw);
    if mode == DecodeMode::Strict {
        if let DecodedResponse::Raw(payload) = &decoded {
            let token = String::from_utf8_lossy(payload);
            if is_status_shaped(&token) {
                return Err(Usc3Error::UnrecognizedStatus(token.into_owned()));
            }
        }
    }
    Ok(decoded)
}

/// A single token made only of ASCII digits, with an optional leading `-`.
fn is_status_shaped(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a space-separated integer payload like `"10 20 30"` → `[10, 20, 30]`.
pub fn parse_vector(payload: &[u8]) -> Usc3Result<Vec<i64>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| Usc3Error::InvalidResponse(format!("Invalid UTF-8 payload: {e}")))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(Usc3Error::InvalidResponse("Empty vector payload".into()));
    }
    text.split(' ')
        .map(|field| {
            field.parse::<i64>().map_err(|e| {
                Usc3Error::InvalidResponse(format!("Failed to parse '{field}' in '{text}': {e}"))
            })
        })
        .collect()
}
