// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Walks a compiled plan against a raw buffer, producing a flattened
//! [`FlatMessage`].
//!
//! Array handling follows one rule set throughout:
//! - A *dynamic* array of `uint8`/`int8` (including the `byte`/`char`
//!   aliases) always collapses to a single blob entry, regardless of
//!   `max_array_size` — this is what keeps a `sensor_msgs/Image`'s
//!   `uint8[] data` from exploding into one value entry per pixel byte.
//! - A *fixed* array of the same element kind only collapses to a blob when
//!   its declared length exceeds `max_array_size`; otherwise it decodes
//!   element-by-element like any other small array.
//! - Every other array (any other element type, fixed or dynamic) is
//!   rejected with [`IntrospectionError::TooManyElements`] once its length
//!   exceeds `max_array_size`.

use crate::core::cursor::Cursor;
use crate::core::error::IntrospectionError;
use crate::core::flat::{child_path, indexed_path, FlatMessage};
use crate::core::plan::{CompiledField, CompiledMessage, ElementKind};
use crate::core::value::Variant;
use crate::core::Result;
use crate::schema::ast::{ArrayKind, BuiltinKind};

/// Deserialize `buffer` against `plan` into `flat`, which is cleared first.
/// `root_path` prefixes every emitted path — callers register schemas by
/// topic, not by type name, so this is the topic identifier (e.g.
/// `"/joint_states"`), not `plan.type_name`. Returns an error if the buffer
/// is short, an array exceeds `max_array_size`, or any other decode rule is
/// violated. On success every byte of `buffer` has been consumed exactly
/// once.
pub fn deserialize(
    plan: &CompiledMessage,
    buffer: &[u8],
    flat: &mut FlatMessage,
    root_path: &str,
    max_array_size: usize,
) -> Result<()> {
    flat.clear();
    let mut cursor = Cursor::new(buffer);
    decode_message(plan, &mut cursor, flat, root_path, max_array_size)?;

    if cursor.remaining() != 0 {
        return Err(IntrospectionError::TruncatedBuffer {
            requested: cursor.remaining(),
            available: 0,
            cursor_pos: cursor.position(),
        });
    }
    Ok(())
}

pub(crate) fn decode_message(
    plan: &CompiledMessage,
    cursor: &mut Cursor<'_>,
    flat: &mut FlatMessage,
    path: &str,
    max_array_size: usize,
) -> Result<()> {
    for field in &plan.fields {
        decode_field(field, cursor, flat, path, max_array_size)?;
    }
    Ok(())
}

fn decode_field(
    field: &CompiledField,
    cursor: &mut Cursor<'_>,
    flat: &mut FlatMessage,
    parent_path: &str,
    max_array_size: usize,
) -> Result<()> {
    let field_path = child_path(parent_path, &field.name);

    match field.array {
        ArrayKind::None => decode_element(&field.element, cursor, flat, &field_path, max_array_size),
        ArrayKind::Dynamic => {
            let count = cursor.read_u32()? as usize;
            let element_size = fixed_element_size(&field.element);
            if let Some(size) = element_size {
                let needed = count.saturating_mul(size);
                if needed > cursor.remaining() {
                    return Err(IntrospectionError::InvalidLength {
                        length: count as i64,
                        cursor_pos: cursor.position(),
                    });
                }
            }
            decode_array_body(field, cursor, flat, &field_path, count, max_array_size)
        }
        ArrayKind::Fixed(count) => {
            decode_array_body(field, cursor, flat, &field_path, count, max_array_size)
        }
    }
}

/// Byte width of a fixed-size scalar element, or `None` for variable-width
/// elements (`string`, nested messages) whose total size can't be predicted
/// from the count alone.
fn fixed_element_size(element: &ElementKind) -> Option<usize> {
    match element {
        ElementKind::Nested(_) => None,
        ElementKind::Builtin(BuiltinKind::String) => None,
        ElementKind::Builtin(kind) => Some(match kind {
            BuiltinKind::Bool | BuiltinKind::Int8 | BuiltinKind::UInt8 => 1,
            BuiltinKind::Int16 | BuiltinKind::UInt16 => 2,
            BuiltinKind::Int32 | BuiltinKind::UInt32 | BuiltinKind::Float32 => 4,
            BuiltinKind::Int64 | BuiltinKind::UInt64 | BuiltinKind::Float64 => 8,
            BuiltinKind::Time | BuiltinKind::Duration => 8,
            BuiltinKind::String => unreachable!("handled above"),
        }),
    }
}

pub(crate) fn is_blob_eligible(element: &ElementKind, array: ArrayKind, count: usize, max_array_size: usize) -> bool {
    let byte_like = matches!(
        element,
        ElementKind::Builtin(kind) if kind.is_byte_like()
    );
    if !byte_like {
        return false;
    }
    match array {
        ArrayKind::Dynamic => true,
        ArrayKind::Fixed(_) => count > max_array_size,
        ArrayKind::None => false,
    }
}

fn decode_array_body(
    field: &CompiledField,
    cursor: &mut Cursor<'_>,
    flat: &mut FlatMessage,
    field_path: &str,
    count: usize,
    max_array_size: usize,
) -> Result<()> {
    if is_blob_eligible(&field.element, field.array, count, max_array_size) {
        let bytes = cursor.read_bytes(count)?.to_vec();
        flat.push_blob(field_path.to_string(), bytes);
        return Ok(());
    }

    if count > max_array_size {
        return Err(IntrospectionError::TooManyElements {
            limit: max_array_size,
            seen: count,
        });
    }

    for i in 0..count {
        let element_path = indexed_path(field_path, i);
        decode_element(&field.element, cursor, flat, &element_path, max_array_size)?;
    }
    Ok(())
}

fn decode_element(
    element: &ElementKind,
    cursor: &mut Cursor<'_>,
    flat: &mut FlatMessage,
    path: &str,
    max_array_size: usize,
) -> Result<()> {
    match element {
        ElementKind::Nested(nested) => decode_message(nested, cursor, flat, path, max_array_size),
        ElementKind::Builtin(BuiltinKind::String) => {
            let s = cursor.read_string()?;
            flat.push_name(path.to_string(), s);
            Ok(())
        }
        ElementKind::Builtin(kind) => {
            let value = decode_scalar(*kind, cursor)?;
            flat.push_value(path.to_string(), value);
            Ok(())
        }
    }
}

pub(crate) fn decode_scalar(kind: BuiltinKind, cursor: &mut Cursor<'_>) -> Result<Variant> {
    Ok(match kind {
        BuiltinKind::Bool => Variant::Bool(cursor.read_bool()?),
        BuiltinKind::Int8 => Variant::Int8(cursor.read_i8()?),
        BuiltinKind::Int16 => Variant::Int16(cursor.read_i16()?),
        BuiltinKind::Int32 => Variant::Int32(cursor.read_i32()?),
        BuiltinKind::Int64 => Variant::Int64(cursor.read_i64()?),
        BuiltinKind::UInt8 => Variant::UInt8(cursor.read_u8()?),
        BuiltinKind::UInt16 => Variant::UInt16(cursor.read_u16()?),
        BuiltinKind::UInt32 => Variant::UInt32(cursor.read_u32()?),
        BuiltinKind::UInt64 => Variant::UInt64(cursor.read_u64()?),
        BuiltinKind::Float32 => Variant::Float32(cursor.read_f32()?),
        BuiltinKind::Float64 => Variant::Float64(cursor.read_f64()?),
        BuiltinKind::Time => Variant::Time {
            sec: cursor.read_u32()?,
            nsec: cursor.read_u32()?,
        },
        BuiltinKind::Duration => Variant::Duration {
            sec: cursor.read_i32()?,
            nsec: cursor.read_i32()?,
        },
        BuiltinKind::String => unreachable!("strings are handled by decode_element directly"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::compile;
    use crate::schema::ast::{MessageSchema, ROSField, ROSMessage, ROSType};
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Write;

    fn joint_state_schema() -> MessageSchema {
        let mut schema = MessageSchema::new("JointState");
        let mut header = ROSMessage::new("std_msgs/Header");
        header.add_field(ROSField::field("seq", ROSType::parse("uint32")));
        header.add_field(ROSField::field("stamp", ROSType::parse("time")));
        header.add_field(ROSField::field("frame_id", ROSType::parse("string")));
        schema.add_message(header);

        let mut js = ROSMessage::new("JointState");
        js.add_field(ROSField::field("header", ROSType::parse("Header")));
        js.add_field(ROSField::field("name", ROSType::parse("string[]")));
        js.add_field(ROSField::field("position", ROSType::parse("float64[]")));
        js.add_field(ROSField::field("velocity", ROSType::parse("float64[]")));
        js.add_field(ROSField::field("effort", ROSType::parse("float64[]")));
        schema.add_message(js);
        schema
    }

    fn write_string(buf: &mut Vec<u8>, s: &str) {
        buf.write_u32::<LittleEndian>(s.len() as u32).unwrap();
        buf.write_all(s.as_bytes()).unwrap();
    }

    #[test]
    fn decodes_joint_state_with_one_joint() {
        let schema = joint_state_schema();
        let plan = compile(&schema).unwrap();

        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(2016).unwrap(); // seq
        buf.write_u32::<LittleEndian>(1234).unwrap(); // stamp.sec
        buf.write_u32::<LittleEndian>(567_000_000).unwrap(); // stamp.nsec
        write_string(&mut buf, "pippo");
        buf.write_u32::<LittleEndian>(1).unwrap(); // name[] count
        write_string(&mut buf, "joint1");
        buf.write_u32::<LittleEndian>(1).unwrap(); // position[] count
        buf.write_f64::<LittleEndian>(1.5).unwrap();
        buf.write_u32::<LittleEndian>(1).unwrap(); // velocity[] count
        buf.write_f64::<LittleEndian>(0.5).unwrap();
        buf.write_u32::<LittleEndian>(1).unwrap(); // effort[] count
        buf.write_f64::<LittleEndian>(0.1).unwrap();

        let mut flat = FlatMessage::new();
        deserialize(&plan, &buf, &mut flat, &plan.type_name, 100).unwrap();

        assert_eq!(flat.value[0], ("JointState/header/seq".to_string(), Variant::UInt32(2016)));
        assert_eq!(
            flat.value[1].0,
            "JointState/header/stamp".to_string()
        );
        assert_eq!(flat.name[0], ("JointState/header/frame_id".to_string(), "pippo".to_string()));
        assert_eq!(flat.name[1], ("JointState/name.0".to_string(), "joint1".to_string()));
        assert_eq!(
            flat.value.iter().find(|(p, _)| p == "JointState/position.0").unwrap().1,
            Variant::Float64(1.5)
        );
    }

    #[test]
    fn dynamic_byte_array_always_becomes_blob() {
        let mut schema = MessageSchema::new("Image");
        let mut msg = ROSMessage::new("Image");
        msg.add_field(ROSField::field("data", ROSType::parse("uint8[]")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let payload = vec![7u8; 50];
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        buf.extend_from_slice(&payload);

        let mut flat = FlatMessage::new();
        // max_array_size of 10 would normally reject 50 elements, but byte-like
        // dynamic arrays bypass that check entirely.
        deserialize(&plan, &buf, &mut flat, &plan.type_name, 10).unwrap();
        assert_eq!(flat.blob.len(), 1);
        assert_eq!(flat.blob[0].1.len(), 50);
        assert!(flat.value.is_empty());
    }

    #[test]
    fn fixed_byte_array_under_limit_decodes_per_element() {
        let mut schema = MessageSchema::new("Small");
        let mut msg = ROSMessage::new("Small");
        msg.add_field(ROSField::field("bytes", ROSType::parse("uint8[4]")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let buf = vec![1u8, 2, 3, 4];
        let mut flat = FlatMessage::new();
        deserialize(&plan, &buf, &mut flat, &plan.type_name, 100).unwrap();
        assert_eq!(flat.value.len(), 4);
        assert!(flat.blob.is_empty());
    }

    #[test]
    fn fixed_byte_array_over_limit_becomes_blob() {
        let mut schema = MessageSchema::new("Big");
        let mut msg = ROSMessage::new("Big");
        msg.add_field(ROSField::field("bytes", ROSType::parse("uint8[20]")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let buf = vec![9u8; 20];
        let mut flat = FlatMessage::new();
        deserialize(&plan, &buf, &mut flat, &plan.type_name, 10).unwrap();
        assert_eq!(flat.blob.len(), 1);
        assert_eq!(flat.blob[0].1.len(), 20);
    }

    #[test]
    fn non_byte_array_over_limit_errors() {
        let mut schema = MessageSchema::new("Many");
        let mut msg = ROSMessage::new("Many");
        msg.add_field(ROSField::field("values", ROSType::parse("int16[]")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(6).unwrap();
        for i in 0..6i16 {
            buf.write_i16::<LittleEndian>(i).unwrap();
        }

        let mut flat = FlatMessage::new();
        let err = deserialize(&plan, &buf, &mut flat, &plan.type_name, 4).unwrap_err();
        assert!(matches!(
            err,
            IntrospectionError::TooManyElements { limit: 4, seen: 6 }
        ));
    }

    #[test]
    fn dynamic_array_length_exceeding_remaining_bytes_is_invalid_length() {
        let mut schema = MessageSchema::new("Many");
        let mut msg = ROSMessage::new("Many");
        msg.add_field(ROSField::field("values", ROSType::parse("int16[]")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        // Declares 1000 elements but the buffer holds nowhere near that many
        // bytes — this must be caught before the per-element loop even starts.
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(1000).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();

        let mut flat = FlatMessage::new();
        let err = deserialize(&plan, &buf, &mut flat, &plan.type_name, 10_000).unwrap_err();
        assert!(matches!(
            err,
            IntrospectionError::InvalidLength { length: 1000, .. }
        ));
    }

    #[test]
    fn constants_consume_no_bytes() {
        let mut schema = MessageSchema::new("NavSatStatus");
        let mut msg = ROSMessage::new("NavSatStatus");
        msg.add_field(ROSField::constant(
            "STATUS_GBAS_FIX",
            ROSType::parse("int8"),
            "2",
        ));
        msg.add_field(ROSField::field("status", ROSType::parse("int8")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        assert_eq!(plan.fields.len(), 1);
        let buf = vec![2i8 as u8];
        let mut flat = FlatMessage::new();
        deserialize(&plan, &buf, &mut flat, &plan.type_name, 100).unwrap();
        assert_eq!(flat.value.len(), 1);
        assert_eq!(flat.value[0].0, "NavSatStatus/status");
    }

    #[test]
    fn truncated_buffer_errors() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("x", ROSType::parse("int64")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let buf = vec![0u8; 2];
        let mut flat = FlatMessage::new();
        let err = deserialize(&plan, &buf, &mut flat, &plan.type_name, 100).unwrap_err();
        assert!(matches!(err, IntrospectionError::TruncatedBuffer { .. }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("x", ROSType::parse("int32")));
        schema.add_message(msg);
        let plan = compile(&schema).unwrap();

        let mut buf = Vec::new();
        buf.write_i32::<LittleEndian>(42).unwrap();
        buf.push(0xFF); // extra trailing byte
        let mut flat = FlatMessage::new();
        let err = deserialize(&plan, &buf, &mut flat, &plan.type_name, 100).unwrap_err();
        assert!(matches!(err, IntrospectionError::TruncatedBuffer { .. }));
    }
}
