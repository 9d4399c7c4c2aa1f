//! Binary primitive encoders.
//!
//! Every function appends to a caller-owned buffer and cannot fail.

/// Append a zigzag-encoded variable-length `long`.
///
/// The value is mapped with `(n << 1) ^ (n >> 63)` so that small magnitudes of
/// either sign stay short, then emitted in 7-bit groups, least significant
/// first, with the high bit set on every byte except the last.
#[inline]
pub fn write_zigzag_long(buf: &mut Vec<u8>, n: i64) {
    let mut zigzag = ((n << 1) ^ (n >> 63)) as u64;
    while zigzag & !0x7F != 0 {
        buf.push(((zigzag & 0x7F) | 0x80) as u8);
        zigzag >>= 7;
    }
    buf.push(zigzag as u8);
}

/// Append a zigzag-encoded variable-length `int`.
#[inline]
pub fn write_zigzag_int(buf: &mut Vec<u8>, n: i32) {
    let mut zigzag = ((n << 1) ^ (n >> 31)) as u32;
    while zigzag & !0x7F != 0 {
        buf.push(((zigzag & 0x7F) | 0x80) as u8);
        zigzag >>= 7;
    }
    buf.push(zigzag as u8);
}

/// Append a string: zigzag length followed by the raw UTF-8 bytes.
#[inline]
pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    write_bytes(buf, s.as_bytes());
}

/// Append a byte sequence: zigzag length followed by the raw bytes.
#[inline]
pub fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_zigzag_long(buf, bytes.len() as i64);
    buf.extend_from_slice(bytes);
}

/// Select branch 0 of a `["null", T]` union.
#[inline]
pub fn write_union_null(buf: &mut Vec<u8>) {
    buf.push(0x00);
}

/// Select a non-null union branch by index. The branch value follows.
#[inline]
pub fn write_union_index(buf: &mut Vec<u8>, index: u32) {
    write_zigzag_long(buf, i64::from(index));
}
