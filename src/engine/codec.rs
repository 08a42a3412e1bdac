//! Base64 and hex codecs with round-trip verification.
//!
//! The Base64 round trip is the engine's chief defense against coincidental
//! matches: a token is only treated as authentic encoded data if re-encoding
//! its decoded bytes reproduces the token byte for byte. Hex needs no such
//! check because every fixed-length digit sequence decodes unambiguously.

use base64::prelude::*;

/// Decode a standard-alphabet Base64 string.
pub fn base64_decode(text: &str) -> Option<Vec<u8>> {
    BASE64_STANDARD.decode(text).ok()
}

/// Encode bytes with the standard Base64 alphabet and padding.
pub fn base64_encode(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode and re-encode, accepting only canonical encodings.
///
/// Returns the decoded bytes when re-encoding reproduces `text` exactly.
/// Non-canonical-but-valid encodings are rejected on purpose; they are far
/// more likely to be ordinary text that happens to be Base64-shaped.
pub fn base64_decode_verified(text: &str) -> Option<Vec<u8>> {
    let bytes = base64_decode(text)?;
    if base64_encode(&bytes) == text {
        Some(bytes)
    } else {
        None
    }
}

/// Encode bytes as lowercase hex digits.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex token into bytes.
///
/// Tolerates the shapes the matchers produce: surrounding whitespace, dash
/// separators between byte groups, and an optional `0x` prefix. An odd digit
/// count is left-padded with a zero nibble before pairing.
pub fn hex_decode(text: &str) -> Option<Vec<u8>> {
    let mut digits: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if digits.starts_with("0x") || digits.starts_with("0X") {
        digits.drain(..2);
    }
    if digits.is_empty() {
        return None;
    }
    if digits.len() % 2 != 0 {
        digits.insert(0, '0');
    }
    hex::decode(&digits).ok()
}
