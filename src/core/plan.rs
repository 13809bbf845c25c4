// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compiled traversal plan: a `MessageSchema` resolved once, at registration
//! time, into a tree the deserializer and visitor can walk without redoing
//! name lookups on every call.
//!
//! This is a tree rather than a flat op list (as a CDR-style decoder would
//! use) because ROS1 arrays of nested messages have a runtime-variable
//! element count: decoding element `i` of `sensor_msgs/Imu[]` means
//! recursively walking the `Imu` subtree again, which a precompiled linear
//! op sequence can't express without per-element branching back to the same
//! point. Nested subtrees are `Rc`-shared so a type referenced from several
//! places (or from inside an array) compiles once.

use crate::core::error::IntrospectionError;
use crate::core::Result;
use crate::schema::ast::{ArrayKind, BuiltinKind, MessageSchema, TypeRef};
use std::collections::HashMap;
use std::rc::Rc;

/// What a single compiled field decodes into.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Builtin(BuiltinKind),
    Nested(Rc<CompiledMessage>),
}

/// One field's compiled shape: its element kind plus its array-ness.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    pub element: ElementKind,
    pub array: ArrayKind,
}

/// A message type's compiled field list, ready to be walked by the
/// deserializer or visitor without further name resolution.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    pub type_name: String,
    pub fields: Vec<CompiledField>,
}

/// Resolve every type reference in `schema` starting from its root type,
/// producing a single shared tree. Fails with `UnresolvedType` if the
/// schema's reference closure was not actually complete (the registry is
/// expected to have checked this already, via `MessageSchema::unresolved_references`,
/// but `compile` re-derives the same failure rather than panicking).
pub fn compile(schema: &MessageSchema) -> Result<Rc<CompiledMessage>> {
    let mut memo: HashMap<String, Rc<CompiledMessage>> = HashMap::new();
    compile_message(schema, &schema.root_type, &mut memo)
}

fn compile_message(
    schema: &MessageSchema,
    type_name: &str,
    memo: &mut HashMap<String, Rc<CompiledMessage>>,
) -> Result<Rc<CompiledMessage>> {
    if let Some(existing) = memo.get(type_name) {
        return Ok(existing.clone());
    }

    let message = schema
        .get(type_name)
        .ok_or_else(|| IntrospectionError::UnresolvedType {
            name: type_name.to_string(),
        })?;

    // Insert a placeholder before recursing into fields so a self- or
    // mutually-recursive type reference resolves to the same Rc instead of
    // looping forever. ROS1 messages are not self-recursive in practice, but
    // this keeps `compile` total rather than relying on that.
    let placeholder = Rc::new(CompiledMessage {
        type_name: type_name.to_string(),
        fields: Vec::new(),
    });
    memo.insert(type_name.to_string(), placeholder);

    let mut fields = Vec::with_capacity(message.fields.len());
    for field in message.wire_fields() {
        let element = match &field.field_type.type_ref {
            TypeRef::Builtin(kind) => ElementKind::Builtin(*kind),
            TypeRef::User(name) => ElementKind::Nested(compile_message(schema, name, memo)?),
        };
        fields.push(CompiledField {
            name: field.name.clone(),
            element,
            array: field.field_type.array,
        });
    }

    let compiled = Rc::new(CompiledMessage {
        type_name: type_name.to_string(),
        fields,
    });
    memo.insert(type_name.to_string(), compiled.clone());
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ast::{ROSField, ROSMessage, ROSType};

    #[test]
    fn compiles_scalar_fields() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("x", ROSType::parse("int32")));
        schema.add_message(msg);

        let plan = compile(&schema).unwrap();
        assert_eq!(plan.fields.len(), 1);
        assert!(matches!(
            plan.fields[0].element,
            ElementKind::Builtin(BuiltinKind::Int32)
        ));
    }

    #[test]
    fn compiles_nested_message_once_and_shares_it() {
        let mut schema = MessageSchema::new("Foo");
        let mut foo = ROSMessage::new("Foo");
        foo.add_field(ROSField::field("a", ROSType::parse("bar/Bar")));
        foo.add_field(ROSField::field("b", ROSType::parse("bar/Bar")));
        schema.add_message(foo);
        let mut bar = ROSMessage::new("bar/Bar");
        bar.add_field(ROSField::field("v", ROSType::parse("int32")));
        schema.add_message(bar);

        let plan = compile(&schema).unwrap();
        let (ElementKind::Nested(a), ElementKind::Nested(b)) =
            (&plan.fields[0].element, &plan.fields[1].element)
        else {
            panic!("expected nested elements");
        };
        assert!(Rc::ptr_eq(a, b));
    }

    #[test]
    fn missing_type_reports_unresolved() {
        let mut schema = MessageSchema::new("Foo");
        let mut msg = ROSMessage::new("Foo");
        msg.add_field(ROSField::field("a", ROSType::parse("missing/Pkg")));
        schema.add_message(msg);

        let err = compile(&schema).unwrap_err();
        assert!(matches!(err, IntrospectionError::UnresolvedType { .. }));
    }
}
