// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `FlatMessage`: the ordered, flattened output of deserializing one message
//! against a compiled plan.
//!
//! Paths use `/` between field names and a bare `.N` suffix for array
//! indices, e.g. `"JointState/position.3"` — never `"position[3]"`.

use crate::core::value::Variant;

/// Ordered key/value pairs produced by walking a message buffer.
///
/// Kept as three parallel vectors rather than one `HashMap` because the spec
/// this implements requires declaration-order (DFS) output, and reuse across
/// repeated `deserialize` calls on the same topic is a named access pattern:
/// call `clear()` and decode again into the same allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMessage {
    /// Numeric scalar fields, in DFS/declaration order.
    pub value: Vec<(String, Variant)>,
    /// `string` fields, in DFS/declaration order.
    pub name: Vec<(String, String)>,
    /// Byte-like arrays that hit the blob-fallback rule, each as one entry.
    pub blob: Vec<(String, Vec<u8>)>,
}

impl FlatMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to empty while keeping each vector's allocated capacity, so a
    /// caller decoding the same topic repeatedly doesn't reallocate per call.
    pub fn clear(&mut self) {
        self.value.clear();
        self.name.clear();
        self.blob.clear();
    }

    pub fn push_value(&mut self, path: impl Into<String>, v: Variant) {
        self.value.push((path.into(), v));
    }

    pub fn push_name(&mut self, path: impl Into<String>, s: impl Into<String>) {
        self.name.push((path.into(), s.into()));
    }

    pub fn push_blob(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.blob.push((path.into(), bytes));
    }

    /// Total entry count across all three vectors.
    pub fn len(&self) -> usize {
        self.value.len() + self.name.len() + self.blob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append an array index to a path the way this format requires: a literal
/// `.N` glued onto the parent path, not a bracketed `[N]`.
pub fn indexed_path(parent: &str, index: usize) -> String {
    format!("{parent}.{index}")
}

/// Join a field name onto a parent path with `/`, or return it bare when
/// there is no parent (the root message has no leading slash).
pub fn child_path(parent: &str, field_name: &str) -> String {
    if parent.is_empty() {
        field_name.to_string()
    } else {
        format!("{parent}/{field_name}")
    }
}
