//! Hex formatting for UIDs, blocks and frame traces.

use std::fmt::Write;

/// Lowercase hex without separators: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        // writing to a String cannot fail
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Lowercase hex, one space between bytes: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Render a frame whose last byte carries only `valid_bits` bits
/// (0 meaning a full byte), e.g. `"93 20"` or `"26/7"`.
pub fn frame_to_hex(bytes: &[u8], valid_bits: u8) -> String {
    let mut s = bytes_to_hex_spaced(bytes);
    if valid_bits != 0 && !bytes.is_empty() {
        let _ = write!(s, "/{}", valid_bits);
    }
    s
}
