// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for schema registration, message deserialization, and the
//! visitor path.

use std::fmt;

/// Errors surfaced by schema registration, deserialization, and visiting.
#[derive(Debug, Clone)]
pub enum IntrospectionError {
    /// `deserialize`/`visit` referenced a `topic_id` nothing was registered under.
    SchemaNotFound {
        /// The topic identifier that was looked up.
        topic_id: String,
    },

    /// The IDL text failed to parse.
    DefinitionParseError {
        /// 1-based line number in the offending definition text.
        line: usize,
        /// Human-readable parse failure reason.
        reason: String,
    },

    /// A field referenced a user type name no block in the definition defines.
    UnresolvedType {
        /// The dangling type name.
        name: String,
    },

    /// The buffer ran out of bytes before the compiled plan finished walking it.
    TruncatedBuffer {
        /// Bytes the read needed.
        requested: usize,
        /// Bytes actually left in the buffer.
        available: usize,
        /// Byte offset the read started at.
        cursor_pos: usize,
    },

    /// A length prefix read off the wire was not representable or made no
    /// sense for the context it was read in (e.g. a negative-looking count).
    InvalidLength {
        /// The length value actually read.
        length: i64,
        /// Byte offset the prefix was read from.
        cursor_pos: usize,
    },

    /// An array's element count exceeded the caller-supplied `max_array_size`.
    TooManyElements {
        /// The configured limit.
        limit: usize,
        /// The count actually read off the wire.
        seen: usize,
    },

    /// A `Variant::convert` narrowing could not represent the source value in
    /// the requested numeric type.
    ConversionOutOfRange {
        /// Name of the source kind, e.g. `"Int32"`.
        from: String,
        /// Name of the requested kind, e.g. `"UInt8"`.
        to: String,
    },

    /// A visitor callback resized the byte window it was handed, violating
    /// the in-place, size-preserving contract `apply_visitor` guarantees.
    InvariantViolation(String),
}

impl IntrospectionError {
    /// Structured fields for `tracing` events.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            IntrospectionError::SchemaNotFound { topic_id } => {
                vec![("topic_id", topic_id.clone())]
            }
            IntrospectionError::DefinitionParseError { line, reason } => vec![
                ("line", line.to_string()),
                ("reason", reason.clone()),
            ],
            IntrospectionError::UnresolvedType { name } => vec![("type", name.clone())],
            IntrospectionError::TruncatedBuffer {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            IntrospectionError::InvalidLength { length, cursor_pos } => vec![
                ("length", length.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            IntrospectionError::TooManyElements { limit, seen } => vec![
                ("limit", limit.to_string()),
                ("seen", seen.to_string()),
            ],
            IntrospectionError::ConversionOutOfRange { from, to } => {
                vec![("from", from.clone()), ("to", to.clone())]
            }
            IntrospectionError::InvariantViolation(invariant) => {
                vec![("invariant", invariant.clone())]
            }
        }
    }
}

impl fmt::Display for IntrospectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntrospectionError::SchemaNotFound { topic_id } => {
                write!(f, "no schema registered for topic '{topic_id}'")
            }
            IntrospectionError::DefinitionParseError { line, reason } => {
                write!(f, "definition parse error at line {line}: {reason}")
            }
            IntrospectionError::UnresolvedType { name } => {
                write!(f, "unresolved type reference: '{name}'")
            }
            IntrospectionError::TruncatedBuffer {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "truncated buffer: needed {requested} bytes at offset {cursor_pos}, only {available} available"
            ),
            IntrospectionError::InvalidLength { length, cursor_pos } => write!(
                f,
                "invalid length prefix {length} read at offset {cursor_pos}"
            ),
            IntrospectionError::TooManyElements { limit, seen } => write!(
                f,
                "array element count {seen} exceeds max_array_size {limit}"
            ),
            IntrospectionError::ConversionOutOfRange { from, to } => {
                write!(f, "cannot convert {from} value into {to} without loss")
            }
            IntrospectionError::InvariantViolation(invariant) => {
                write!(f, "invariant violation: {invariant}")
            }
        }
    }
}

impl std::error::Error for IntrospectionError {}

/// Result type for robocodec operations.
pub type Result<T> = std::result::Result<T, IntrospectionError>;
