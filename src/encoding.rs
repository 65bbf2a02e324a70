//! Big-endian integer encoding and decoding for frame fields and payloads.
//!
//! Every multi-byte integer on the serial link is big-endian. Fields have
//! fixed widths (2 bytes for request ids, lengths, radio parameters and
//! result codes), but the helpers accept any slice width so one set of
//! functions covers headers and payloads alike.
//!
//! ## Functions
//!
//! - [`encode_be_int`]: Writes the low `out.len()` bytes of a signed value
//! - [`decode_be_uint`]: Accumulates a slice into an unsigned value
//! - [`decode_be_int`]: Accumulates a slice into a sign-extended value
//! - [`decode_be_u16`]: Reads the leading 2-byte field of a payload
//!
//! ## Limitations
//!
//! - Widths above 4 bytes keep only the low 32 bits when decoding
//! - Encoding truncates: values that do not fit `out.len()` bytes lose their high bytes

/// Encodes `value` into `out` as a big-endian integer of `out.len()` bytes.
///
/// Two's complement is kept, so `-1` encoded into 2 bytes is `[0xff, 0xff]`.
pub fn encode_be_int(value: i32, out: &mut [u8]) {
    let mut v = value as u32;
    for byte in out.iter_mut().rev() {
        *byte = (v & 0xff) as u8;
        v >>= 8;
    }
}

/// Decodes a big-endian unsigned integer from every byte of `data`.
///
/// An empty slice decodes to `0`.
pub fn decode_be_uint(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}

/// Decodes a big-endian two's complement integer from every byte of `data`,
/// sign-extending from the slice width.
pub fn decode_be_int(data: &[u8]) -> i32 {
    let raw = decode_be_uint(data);
    let bits = data.len() * 8;
    if bits == 0 || bits >= 32 {
        return raw as i32;
    }
    let shift = 32 - bits as u32;
    ((raw << shift) as i32) >> shift
}

/// Reads the leading 2-byte big-endian field of `data`.
///
/// Returns `None` if fewer than 2 bytes are available.
pub fn decode_be_u16(data: &[u8]) -> Option<u16> {
    match data {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_two_bytes() {
        let mut out = [0u8; 2];
        encode_be_int(0x1234, &mut out);
        assert_eq!(out, [0x12, 0x34]);
    }

    #[test]
    fn test_encode_negative_keeps_twos_complement() {
        let mut out = [0u8; 2];
        encode_be_int(-2, &mut out);
        assert_eq!(out, [0xff, 0xfe]);

        let mut wide = [0u8; 4];
        encode_be_int(-2, &mut wide);
        assert_eq!(wide, [0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn test_encode_truncates_high_bytes() {
        let mut out = [0u8; 2];
        encode_be_int(0x0102_0304, &mut out);
        assert_eq!(out, [0x03, 0x04]);
    }

    #[test]
    fn test_decode_uint_accumulates_every_byte() {
        assert_eq!(decode_be_uint(&[]), 0);
        assert_eq!(decode_be_uint(&[0x01]), 1);
        assert_eq!(decode_be_uint(&[0x01, 0x02, 0x03]), 0x01_0203);
    }

    #[test]
    fn test_decode_int_sign_extends() {
        assert_eq!(decode_be_int(&[0xff, 0xfe]), -2);
        assert_eq!(decode_be_int(&[0x7f, 0xff]), 0x7fff);
        assert_eq!(decode_be_int(&[0x80]), -128);
        assert_eq!(decode_be_int(&[0xff, 0xff, 0xff, 0xff]), -1);
    }

    #[test]
    fn test_decode_u16_requires_two_bytes() {
        assert_eq!(decode_be_u16(&[0xab]), None);
        assert_eq!(decode_be_u16(&[0xab, 0xcd, 0xef]), Some(0xabcd));
    }
}
