//! Scalar field decoding.
//!
//! Pure conversions from a byte slice at a given offset into one value of a
//! declared primitive type. Offsets are pre-validated by the layout engine;
//! multi-byte values are little-endian.

use crate::schema::{ScalarType, Value};

pub(crate) fn decode_scalar(dat: &[u8], offset: usize, kind: ScalarType) -> Value {
    let d = &dat[offset..];
    match kind {
        ScalarType::U8 => Value::U8(d[0]),
        ScalarType::I8 => Value::I8(d[0] as i8),
        ScalarType::U16 => Value::U16(u16::from_le_bytes([d[0], d[1]])),
        ScalarType::I16 => Value::I16(i16::from_le_bytes([d[0], d[1]])),
        ScalarType::U32 => Value::U32(u32::from_le_bytes([d[0], d[1], d[2], d[3]])),
        ScalarType::I32 => Value::I32(i32::from_le_bytes([d[0], d[1], d[2], d[3]])),
        ScalarType::U64 => Value::U64(u64::from_le_bytes([
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7],
        ])),
        ScalarType::I64 => Value::I64(i64::from_le_bytes([
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7],
        ])),
        ScalarType::F32 => Value::F32(f32::from_le_bytes([d[0], d[1], d[2], d[3]])),
        ScalarType::F64 => Value::F64(f64::from_le_bytes([
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7],
        ])),
        ScalarType::Char => Value::Str(decode_str(dat, offset, 1)),
    }
}

/// Decode a character region of up to `span` bytes starting at `offset`.
///
/// Stops at the first zero byte if one occurs before the span ends; never
/// reads past the end of `dat`. Bytes map one-to-one to characters, no text
/// encoding assumed.
pub(crate) fn decode_str(dat: &[u8], offset: usize, span: usize) -> String {
    let end = (offset + span).min(dat.len());
    let region = &dat[offset.min(end)..end];
    let stop = region.iter().position(|&b| b == 0).unwrap_or(region.len());
    region[..stop].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_integers() {
        let dat = [0xff, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(decode_scalar(&dat, 0, ScalarType::U8), Value::U8(0xff));
        assert_eq!(decode_scalar(&dat, 0, ScalarType::I8), Value::I8(-1));
        assert_eq!(decode_scalar(&dat, 1, ScalarType::U16), Value::U16(0x0201));
        assert_eq!(
            decode_scalar(&dat, 1, ScalarType::U32),
            Value::U32(0x0403_0201)
        );
        assert_eq!(
            decode_scalar(&dat, 1, ScalarType::U64),
            Value::U64(0x0807_0605_0403_0201)
        );
    }

    #[test]
    fn decode_signed_and_floats() {
        let mut dat = vec![0u8; 6];
        dat[..2].copy_from_slice(&(-300i16).to_le_bytes());
        dat[2..6].copy_from_slice(&1.5f32.to_le_bytes());

        assert_eq!(decode_scalar(&dat, 0, ScalarType::I16), Value::I16(-300));
        assert_eq!(decode_scalar(&dat, 2, ScalarType::F32), Value::F32(1.5));
    }

    #[test]
    fn decode_f64() {
        let mut dat = vec![0u8; 8];
        dat.copy_from_slice(&(-2.25f64).to_le_bytes());
        assert_eq!(decode_scalar(&dat, 0, ScalarType::F64), Value::F64(-2.25));
    }

    #[test]
    fn str_stops_at_terminator() {
        let dat = b"GCS\0\0\0\0\0";
        assert_eq!(decode_str(dat, 0, 8), "GCS");
    }

    #[test]
    fn str_without_terminator_runs_full_span() {
        let dat = b"ABCDEFGH";
        assert_eq!(decode_str(dat, 0, 4), "ABCD");
    }

    #[test]
    fn str_clamped_to_slice_end() {
        // declared span extends past the available bytes
        let dat = b"XY";
        assert_eq!(decode_str(dat, 0, 8), "XY");
        assert_eq!(decode_str(dat, 2, 8), "");
    }
}
