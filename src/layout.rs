//! Payload layout engine.
//!
//! Walks a message's field descriptors against the payload bytes, applying
//! the truncation/zero-fill and extension-field-absence rules. All the
//! order-dependent decode policy lives here, independent of any specific
//! message schema.

use tracing::trace;

use crate::error::Result;
use crate::fields::{decode_scalar, decode_str};
use crate::schema::{FieldDescriptor, Message, ScalarType, Value};

/// Fill `msg` from `payload` according to `fields`, in descriptor order.
///
/// `payload` is the transmitted payload only, without header or checksum.
/// Senders may truncate a trailing run of all-zero bytes; the payload is
/// zero-padded back up to the schema's full declared size before any field
/// is extracted, so truncation is resolved in exactly one place.
pub(crate) fn populate(
    msg: &mut Message,
    fields: &[FieldDescriptor],
    payload: &[u8],
) -> Result<()> {
    let sent_len = payload.len();
    let wire_len: usize = fields.iter().map(FieldDescriptor::wire_size).sum();

    let mut dat = payload.to_vec();
    if dat.len() < wire_len {
        trace!(sent_len, wire_len, "padding truncated payload");
        dat.resize(wire_len, 0);
    }

    let mut cursor = 0usize;
    for (idx, field) in fields.iter().enumerate() {
        let elem_size = field.kind.size();
        match field.count {
            Some(span) if field.kind == ScalarType::Char => {
                let s = decode_str(&dat, cursor, span);
                // A shorter-than-declared string advances the cursor only by
                // the wire bytes it covered, not the full declared span.
                cursor += s.chars().count().min(span);
                msg.set(idx, Value::Str(s));
            }
            Some(count) => {
                let mut elems = Vec::with_capacity(count);
                for _ in 0..count {
                    // Elements starting beyond the transmitted bytes fall in
                    // the zero-padded region: zero-fill without advancing.
                    if cursor < sent_len {
                        elems.push(decode_scalar(&dat, cursor, field.kind));
                        cursor += elem_size;
                    } else {
                        elems.push(Value::zero(field.kind));
                    }
                }
                msg.set(idx, Value::Array(elems));
            }
            None => {
                if field.extension && cursor + elem_size > sent_len {
                    // Omitted by a sender with an older, shorter layout.
                    // Keep the registry default rather than zero-filling.
                    trace!(field = %field.name, "extension field absent");
                    continue;
                }
                msg.set(idx, decode_scalar(&dat, cursor, field.kind));
                cursor += elem_size;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MessageSchema, Registry};

    fn registry_with(fields: Vec<FieldDescriptor>) -> Registry {
        let mut registry = Registry::new();
        registry.register(MessageSchema {
            id: 1,
            name: "TEST".into(),
            crc_seed: 0,
            fields,
        });
        registry
    }

    #[test]
    fn full_payload_all_fields() {
        let registry = registry_with(vec![
            FieldDescriptor::scalar("a", ScalarType::U32),
            FieldDescriptor::scalar("b", ScalarType::I16),
            FieldDescriptor::array("c", ScalarType::U8, 3),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        let mut payload = Vec::new();
        payload.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        payload.extend_from_slice(&(-5i16).to_le_bytes());
        payload.extend_from_slice(&[9, 8, 7]);

        populate(&mut msg, fields, &payload).unwrap();
        assert_eq!(msg.get("a"), Some(&Value::U32(0xdead_beef)));
        assert_eq!(msg.get("b"), Some(&Value::I16(-5)));
        assert_eq!(
            msg.get("c"),
            Some(&Value::Array(vec![Value::U8(9), Value::U8(8), Value::U8(7)]))
        );
    }

    #[test]
    fn truncated_payload_zero_fills() {
        let registry = registry_with(vec![
            FieldDescriptor::scalar("a", ScalarType::U16),
            FieldDescriptor::scalar("b", ScalarType::U32),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        // only "a" and the first byte of "b" transmitted
        populate(&mut msg, fields, &[0x34, 0x12, 0x09]).unwrap();
        assert_eq!(msg.get("a"), Some(&Value::U16(0x1234)));
        assert_eq!(msg.get("b"), Some(&Value::U32(9)));
    }

    #[test]
    fn array_tail_falls_in_padding() {
        let registry = registry_with(vec![FieldDescriptor::array("v", ScalarType::U16, 4)]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        // two of four elements transmitted
        populate(&mut msg, fields, &[0x01, 0x00, 0x02, 0x00]).unwrap();
        assert_eq!(
            msg.get("v"),
            Some(&Value::Array(vec![
                Value::U16(1),
                Value::U16(2),
                Value::U16(0),
                Value::U16(0),
            ]))
        );
    }

    #[test]
    fn extension_field_absent_keeps_default() {
        let registry = registry_with(vec![
            FieldDescriptor::scalar("core", ScalarType::U16),
            FieldDescriptor::scalar("ext", ScalarType::U8)
                .extension()
                .with_default(Value::U8(3)),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        // payload covers only the core field
        populate(&mut msg, fields, &[0x22, 0x11]).unwrap();
        assert_eq!(msg.get("core"), Some(&Value::U16(0x1122)));
        assert_eq!(msg.get("ext"), Some(&Value::U8(3)));
    }

    #[test]
    fn extension_field_present_decodes() {
        let registry = registry_with(vec![
            FieldDescriptor::scalar("core", ScalarType::U16),
            FieldDescriptor::scalar("ext", ScalarType::U8)
                .extension()
                .with_default(Value::U8(3)),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        populate(&mut msg, fields, &[0x22, 0x11, 0x55]).unwrap();
        assert_eq!(msg.get("ext"), Some(&Value::U8(0x55)));
    }

    #[test]
    fn short_string_advances_cursor_by_its_own_length() {
        let registry = registry_with(vec![
            FieldDescriptor::array("text", ScalarType::Char, 8),
            FieldDescriptor::scalar("after", ScalarType::U8),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        // "hi" terminated at byte 2; the next field reads from byte 2, not 8
        let payload = [b'h', b'i', 0, 0xcc, 0, 0, 0, 0, 0];
        populate(&mut msg, fields, &payload).unwrap();
        assert_eq!(msg.get("text").and_then(Value::as_str), Some("hi"));
        assert_eq!(msg.get("after"), Some(&Value::U8(0)));
    }

    #[test]
    fn full_length_string_advances_full_span() {
        let registry = registry_with(vec![
            FieldDescriptor::array("text", ScalarType::Char, 4),
            FieldDescriptor::scalar("after", ScalarType::U8),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        let payload = [b'A', b'B', b'C', b'D', 0x2a];
        populate(&mut msg, fields, &payload).unwrap();
        assert_eq!(msg.get("text").and_then(Value::as_str), Some("ABCD"));
        assert_eq!(msg.get("after"), Some(&Value::U8(0x2a)));
    }

    #[test]
    fn empty_payload_decodes_all_defaults() {
        let registry = registry_with(vec![
            FieldDescriptor::scalar("a", ScalarType::U64),
            FieldDescriptor::array("b", ScalarType::F32, 2),
        ]);
        let (mut msg, fields) = registry.instantiate(0, 0, 1).unwrap();

        populate(&mut msg, fields, &[]).unwrap();
        assert_eq!(msg.get("a"), Some(&Value::U64(0)));
        assert_eq!(
            msg.get("b"),
            Some(&Value::Array(vec![Value::F32(0.0), Value::F32(0.0)]))
        );
    }
}
