use thiserror::Error;

use crate::colorimetry::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty color string")]
    Empty,
    #[error("expected 6 hex digits, found {0}")]
    InvalidLength(usize),
    #[error("invalid hex digits")]
    InvalidHex,
    #[error("color value is not a string")]
    NotAString,
}

/// Decode a hex color into an RGB triple.
///
/// Accepts `RRGGBB` with an optional leading `#`. Shorthand (`#RGB`) and
/// alpha forms are rejected.
pub fn decode_hex(value: &str) -> Result<Rgb, DecodeError> {
    use DecodeError::*;

    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.is_empty() {
        return Err(Empty);
    }

    let nibble = |c: u8| -> Result<u8, DecodeError> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(InvalidHex),
        }
    };

    let len = hex.chars().count();
    if len != 6 {
        return Err(InvalidLength(len));
    }
    if !hex.is_ascii() {
        return Err(InvalidHex);
    }

    let bytes = hex.as_bytes();

    let byte = |hi: u8, lo: u8| -> Result<u8, DecodeError> { Ok(nibble(hi)? << 4 | nibble(lo)?) };

    Ok(Rgb::new(
        byte(bytes[0], bytes[1])?,
        byte(bytes[2], bytes[3])?,
        byte(bytes[4], bytes[5])?,
    ))
}
