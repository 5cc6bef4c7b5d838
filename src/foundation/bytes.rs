//! Fixed-width field encoding.
//!
//! The container mixes two byte orders: payload records (header record,
//! structured info, renditions) are little-endian, while the BOM structures
//! (store header, trees, index table) are big-endian. Callers pick the helper
//! matching the region they serialize.

use crate::foundation::error::{LcrError, LcrResult};

/// Little-endian 32-bit field.
pub fn le_i32(v: i32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Little-endian 16-bit field.
pub fn le_i16(v: i16) -> [u8; 2] {
    v.to_le_bytes()
}

/// Big-endian ("swapped") 32-bit field.
pub fn be_u32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

/// Big-endian ("swapped") 16-bit field.
pub fn be_u16(v: u16) -> [u8; 2] {
    v.to_be_bytes()
}

/// Converts a byte length into a 32-bit LE length field.
pub fn le_len(len: usize) -> LcrResult<[u8; 4]> {
    let v = i32::try_from(len)
        .map_err(|_| LcrError::encoding_overflow(format!("length {len} exceeds i32 field")))?;
    Ok(le_i32(v))
}

/// Converts a byte length or offset into a 32-bit BE field.
pub fn be_len(len: usize) -> LcrResult<[u8; 4]> {
    let v = u32::try_from(len)
        .map_err(|_| LcrError::encoding_overflow(format!("value {len} exceeds u32 field")))?;
    Ok(be_u32(v))
}

/// `n` zero bytes.
pub fn zeros(n: usize) -> Vec<u8> {
    vec![0u8; n]
}

/// ASCII string followed by zero fill up to exactly `width` bytes.
///
/// Fails rather than truncating when `s` does not fit.
pub fn padded_ascii(s: &str, width: usize) -> LcrResult<Vec<u8>> {
    if !s.is_ascii() {
        return Err(LcrError::encoding_overflow(format!(
            "'{s}' is not ASCII and cannot be stored in a {width}-byte field"
        )));
    }
    pad_to(s.as_bytes(), width)
}

/// Copies `bytes` into a zero-filled block of exactly `width` bytes.
pub fn pad_to(bytes: &[u8], width: usize) -> LcrResult<Vec<u8>> {
    if bytes.len() > width {
        return Err(LcrError::encoding_overflow(format!(
            "{} bytes do not fit a {width}-byte block",
            bytes.len()
        )));
    }
    let mut out = Vec::with_capacity(width);
    out.extend_from_slice(bytes);
    out.resize(width, 0);
    Ok(out)
}

/// Concatenates segments in order.
pub fn concat(segments: &[&[u8]]) -> Vec<u8> {
    let total = segments.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(total);
    for s in segments {
        out.extend_from_slice(s);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/bytes.rs"]
mod tests;
