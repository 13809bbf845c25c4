// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 message type model: `ROSType`, `ROSField`, `ROSMessage`, `MessageSchema`.
//!
//! Unlike a CDR/DDS type model there is no alignment to track here: ROS1's
//! wire format packs every field back to back with no padding.

use std::collections::HashMap;

/// The builtin scalar kinds a ROS1 `.msg` field can name directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Time,
    Duration,
}

impl BuiltinKind {
    /// Parse a builtin type keyword, including ROS1's `byte`/`char` aliases.
    pub fn try_from_str(s: &str) -> Option<Self> {
        Some(match s {
            "bool" => BuiltinKind::Bool,
            "int8" | "byte" => BuiltinKind::Int8,
            "int16" => BuiltinKind::Int16,
            "int32" => BuiltinKind::Int32,
            "int64" => BuiltinKind::Int64,
            "uint8" | "char" => BuiltinKind::UInt8,
            "uint16" => BuiltinKind::UInt16,
            "uint32" => BuiltinKind::UInt32,
            "uint64" => BuiltinKind::UInt64,
            "float32" => BuiltinKind::Float32,
            "float64" => BuiltinKind::Float64,
            "string" => BuiltinKind::String,
            "time" => BuiltinKind::Time,
            "duration" => BuiltinKind::Duration,
            _ => return None,
        })
    }

    /// Fixed wire width in bytes, or `None` for variable-length (`string`).
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            BuiltinKind::Bool | BuiltinKind::Int8 | BuiltinKind::UInt8 => Some(1),
            BuiltinKind::Int16 | BuiltinKind::UInt16 => Some(2),
            BuiltinKind::Int32 | BuiltinKind::UInt32 | BuiltinKind::Float32 => Some(4),
            BuiltinKind::Int64
            | BuiltinKind::UInt64
            | BuiltinKind::Float64
            | BuiltinKind::Time
            | BuiltinKind::Duration => Some(8),
            BuiltinKind::String => None,
        }
    }

    /// Whether this is one of the byte-sized numeric kinds eligible for the
    /// blob-fallback exception (`uint8`/`int8`, including their `char`/`byte`
    /// aliases).
    pub fn is_byte_like(&self) -> bool {
        matches!(self, BuiltinKind::UInt8 | BuiltinKind::Int8)
    }
}

/// How many elements a field's array suffix describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Not an array: a single scalar or nested-message value.
    None,
    /// `T[n]`: exactly `n` elements, no length prefix on the wire.
    Fixed(usize),
    /// `T[]`: a `u32` element count prefix on the wire.
    Dynamic,
}

/// The resolved kind of a field's element type: either a builtin scalar or a
/// reference to another message type (resolved by name at registration time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Builtin(BuiltinKind),
    /// Fully-qualified type name, e.g. `std_msgs/Header`.
    User(String),
}

/// A field's declared type: element kind plus array-ness, exactly as written
/// in the `.msg` text (before cross-reference resolution against sibling
/// blocks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ROSType {
    pub type_ref: TypeRef,
    pub array: ArrayKind,
}

impl ROSType {
    /// Parse a single type token such as `float64[3]`, `string[]`, or
    /// `sensor_msgs/Imu`. Bare `Header` is normalized to `std_msgs/Header`,
    /// matching the ROS1 wire quirk where the header package is implicit.
    pub fn parse(token: &str) -> Self {
        let (base, array) = match token.find('[') {
            Some(bracket_pos) => {
                let base = &token[..bracket_pos];
                let inside = &token[bracket_pos + 1..token.rfind(']').unwrap_or(token.len())];
                let digits: String = inside.chars().filter(|c| c.is_ascii_digit()).collect();
                let array = if digits.is_empty() {
                    ArrayKind::Dynamic
                } else {
                    ArrayKind::Fixed(digits.parse().unwrap_or(0))
                };
                (base, array)
            }
            None => (token, ArrayKind::None),
        };

        let base = base.trim();
        let type_ref = if let Some(builtin) = BuiltinKind::try_from_str(base) {
            TypeRef::Builtin(builtin)
        } else if base == "Header" {
            TypeRef::User("std_msgs/Header".to_string())
        } else {
            TypeRef::User(base.to_string())
        };

        ROSType { type_ref, array }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.type_ref, TypeRef::Builtin(_))
    }
}

/// A single field of a message, including ROS1 constants (`is_constant`).
/// Constants never consume wire bytes and are skipped during traversal-plan
/// compilation, but they are retained here for introspection/round-tripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ROSField {
    pub name: String,
    pub field_type: ROSType,
    pub is_constant: bool,
    /// Raw literal text from `TYPE NAME = LITERAL`, unparsed.
    pub constant_text: Option<String>,
}

impl ROSField {
    pub fn field(name: impl Into<String>, field_type: ROSType) -> Self {
        ROSField {
            name: name.into(),
            field_type,
            is_constant: false,
            constant_text: None,
        }
    }

    pub fn constant(name: impl Into<String>, field_type: ROSType, literal: impl Into<String>) -> Self {
        ROSField {
            name: name.into(),
            field_type,
            is_constant: true,
            constant_text: Some(literal.into()),
        }
    }
}

/// A single `MSG:`-delimited block: a fully-qualified type name plus its
/// ordered field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ROSMessage {
    pub type_name: String,
    pub fields: Vec<ROSField>,
}

impl ROSMessage {
    pub fn new(type_name: impl Into<String>) -> Self {
        ROSMessage {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: ROSField) {
        self.fields.push(field);
    }

    /// Non-constant fields only, in declaration order — the shape the
    /// traversal plan compiler actually walks.
    pub fn wire_fields(&self) -> impl Iterator<Item = &ROSField> {
        self.fields.iter().filter(|f| !f.is_constant)
    }
}

/// The full set of message blocks produced by parsing one IDL text blob, plus
/// the name of the root (entry point) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    pub root_type: String,
    pub messages: HashMap<String, ROSMessage>,
}

impl MessageSchema {
    pub fn new(root_type: impl Into<String>) -> Self {
        MessageSchema {
            root_type: root_type.into(),
            messages: HashMap::new(),
        }
    }

    pub fn add_message(&mut self, message: ROSMessage) {
        self.messages.insert(message.type_name.clone(), message);
    }

    pub fn get(&self, type_name: &str) -> Option<&ROSMessage> {
        self.messages.get(type_name)
    }

    /// Every user-defined type name referenced anywhere in the schema
    /// (including transitively, through array element types) but not present
    /// among `self.messages` — i.e. what's left unresolved after parsing all
    /// blocks. An empty result means the schema's reference closure is
    /// complete.
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for message in self.messages.values() {
            for field in message.wire_fields() {
                if let TypeRef::User(name) = &field.field_type.type_ref {
                    if !self.messages.contains_key(name) {
                        missing.push(name.clone());
                    }
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar() {
        let t = ROSType::parse("int32");
        assert_eq!(t.type_ref, TypeRef::Builtin(BuiltinKind::Int32));
        assert_eq!(t.array, ArrayKind::None);
    }

    #[test]
    fn parses_dynamic_array() {
        let t = ROSType::parse("float64[]");
        assert_eq!(t.type_ref, TypeRef::Builtin(BuiltinKind::Float64));
        assert_eq!(t.array, ArrayKind::Dynamic);
    }

    #[test]
    fn parses_fixed_array() {
        let t = ROSType::parse("float32[9]");
        assert_eq!(t.array, ArrayKind::Fixed(9));
    }

    #[test]
    fn normalizes_bare_header() {
        let t = ROSType::parse("Header");
        assert_eq!(t.type_ref, TypeRef::User("std_msgs/Header".to_string()));
    }

    #[test]
    fn nested_user_type_passthrough() {
        let t = ROSType::parse("sensor_msgs/Imu");
        assert_eq!(t.type_ref, TypeRef::User("sensor_msgs/Imu".to_string()));
    }

    #[test]
    fn byte_and_char_alias_to_int8_uint8() {
        assert_eq!(BuiltinKind::try_from_str("byte"), Some(BuiltinKind::Int8));
        assert_eq!(BuiltinKind::try_from_str("char"), Some(BuiltinKind::UInt8));
    }

    #[test]
    fn unresolved_references_detects_missing_type() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("bar", ROSType::parse("pkg/Bar")));
        schema.add_message(msg);
        assert_eq!(schema.unresolved_references(), vec!["pkg/Bar".to_string()]);
    }

    #[test]
    fn unresolved_references_empty_when_closed() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("bar", ROSType::parse("pkg/Bar")));
        schema.add_message(msg);
        schema.add_message(ROSMessage::new("pkg/Bar"));
        assert!(schema.unresolved_references().is_empty());
    }
}
