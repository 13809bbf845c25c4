// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Visits every occurrence of a target message type inside a buffer,
//! exposing each to a callback as a mutable byte window without building a
//! `FlatMessage`.
//!
//! The contract: locate every occurrence by measuring them (a DFS walk that
//! does not record any values), then for each one, in declaration order,
//! hand the callback `&mut [u8]` bounded to exactly that occurrence and
//! re-decode the (possibly callback-mutated) window, requiring it to still
//! consume to exactly its original length. A callback is free to overwrite
//! bytes in place; it must not leave the window internally inconsistent
//! (e.g. a corrupted length prefix that would desynchronize a subsequent
//! decode). A match is not searched recursively — once a sub-message's type
//! matches, its bytes are skipped as one occurrence rather than walked for
//! nested matches of the same type.

use crate::core::cursor::Cursor;
use crate::core::deserializer::{decode_message, decode_scalar, deserialize, is_blob_eligible};
use crate::core::error::IntrospectionError;
use crate::core::flat::FlatMessage;
use crate::core::plan::{CompiledField, CompiledMessage, ElementKind};
use crate::core::Result;
use crate::schema::ast::ArrayKind;
use std::rc::Rc;

type Occurrence = (usize, usize, Rc<CompiledMessage>);

/// Find every occurrence (DFS, declaration order) of `target_type` inside
/// `buffer` as decoded by `root`, and invoke `callback` once per occurrence
/// with a mutable window over exactly those bytes. Returns `Ok(false)` if
/// `target_type` does not occur anywhere in the message (not an error: the
/// type may simply be absent from this particular schema, e.g. asking for a
/// `sensor_msgs/Imu` inside a message that has none).
pub fn visit<F>(
    root: &Rc<CompiledMessage>,
    target_type: &str,
    buffer: &mut [u8],
    max_array_size: usize,
    mut callback: F,
) -> Result<bool>
where
    F: FnMut(&mut [u8]) -> Result<()>,
{
    let occurrences = {
        let view: &[u8] = buffer;
        let mut cursor = Cursor::new(view);
        let mut found = Vec::new();
        search_message(root, &mut cursor, target_type, max_array_size, &mut found)?;
        found
    };

    if occurrences.is_empty() {
        return Ok(false);
    }

    for (start, end, matched_plan) in occurrences {
        let window = &mut buffer[start..end];
        callback(window)?;

        let mut scratch = FlatMessage::new();
        deserialize(&matched_plan, window, &mut scratch, target_type, max_array_size).map_err(|e| {
            IntrospectionError::InvariantViolation(format!(
                "visitor callback left '{target_type}' window undecodable: {e}"
            ))
        })?;
    }

    Ok(true)
}

fn search_message(
    plan: &Rc<CompiledMessage>,
    cursor: &mut Cursor<'_>,
    target_type: &str,
    max_array_size: usize,
    found: &mut Vec<Occurrence>,
) -> Result<()> {
    if plan.type_name == target_type {
        let start = cursor.position();
        skip_message(plan, cursor, max_array_size)?;
        let end = cursor.position();
        found.push((start, end, plan.clone()));
        return Ok(());
    }

    for field in &plan.fields {
        search_field(field, cursor, target_type, max_array_size, found)?;
    }
    Ok(())
}

fn skip_message(plan: &CompiledMessage, cursor: &mut Cursor<'_>, max_array_size: usize) -> Result<()> {
    let mut scratch = FlatMessage::new();
    decode_message(plan, cursor, &mut scratch, "", max_array_size)
}

fn search_field(
    field: &CompiledField,
    cursor: &mut Cursor<'_>,
    target_type: &str,
    max_array_size: usize,
    found: &mut Vec<Occurrence>,
) -> Result<()> {
    match field.array {
        ArrayKind::None => search_element(&field.element, cursor, target_type, max_array_size, found),
        ArrayKind::Dynamic => {
            let count = cursor.read_u32()? as usize;
            search_array(field, cursor, count, target_type, max_array_size, found)
        }
        ArrayKind::Fixed(count) => search_array(field, cursor, count, target_type, max_array_size, found),
    }
}

fn search_array(
    field: &CompiledField,
    cursor: &mut Cursor<'_>,
    count: usize,
    target_type: &str,
    max_array_size: usize,
    found: &mut Vec<Occurrence>,
) -> Result<()> {
    if is_blob_eligible(&field.element, field.array, count, max_array_size) {
        cursor.read_bytes(count)?;
        return Ok(());
    }

    if count > max_array_size {
        return Err(IntrospectionError::TooManyElements {
            limit: max_array_size,
            seen: count,
        });
    }

    for _ in 0..count {
        search_element(&field.element, cursor, target_type, max_array_size, found)?;
    }
    Ok(())
}

fn search_element(
    element: &ElementKind,
    cursor: &mut Cursor<'_>,
    target_type: &str,
    max_array_size: usize,
    found: &mut Vec<Occurrence>,
) -> Result<()> {
    match element {
        ElementKind::Nested(nested) => search_message(nested, cursor, target_type, max_array_size, found),
        ElementKind::Builtin(crate::schema::ast::BuiltinKind::String) => {
            cursor.read_string()?;
            Ok(())
        }
        ElementKind::Builtin(kind) => {
            decode_scalar(*kind, cursor)?;
            Ok(())
        }
    }
}
