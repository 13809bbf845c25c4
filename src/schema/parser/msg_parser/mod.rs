// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 `.msg` format parser, built on `pest`.
//!
//! The format supports:
//! - A root block (the entry-point type's field list, no header)
//! - Dependency blocks, each starting with a `"MSG: package/Name"` header
//!   and separated from the previous block by a line of `====`
//! - Array types: `T[]` (dynamic) or `T[n]` (fixed)
//! - Nested types: `package/MessageName`, or bare `Header`
//! - `#`-style comments
//! - Constants: `TYPE NAME = LITERAL` on scalar builtin fields only

use crate::core::error::IntrospectionError;
use crate::core::Result;
use crate::schema::ast::{ArrayKind, MessageSchema, ROSField, ROSMessage, ROSType};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "schema/parser/msg_parser/msg.pest"]
struct MsgParser;

/// Parse ROS1 `.msg`-style multi-definition text. `root_type_name` becomes
/// the schema's root type and the name of the first (headerless) block.
pub fn parse(root_type_name: &str, definition: &str) -> Result<MessageSchema> {
    let pairs = MsgParser::parse(Rule::schema, definition).map_err(|e| {
        let line = match e.line_col {
            pest::error::LineColLocation::Pos((line, _)) => line,
            pest::error::LineColLocation::Span((line, _), _) => line,
        };
        IntrospectionError::DefinitionParseError {
            line,
            reason: e.to_string(),
        }
    })?;

    let mut schema = MessageSchema::new(root_type_name);

    for pair in pairs {
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::EOI => {}
                Rule::root_msg => {
                    let mut message = ROSMessage::new(root_type_name);
                    for line in item.into_inner() {
                        if let Some(field) = parse_msg_line(line)? {
                            message.add_field(field);
                        }
                    }
                    schema.add_message(message);
                }
                Rule::dependency_msg => {
                    let mut inner = item.into_inner();
                    let header = inner
                        .next()
                        .expect("dependency_msg always starts with dependency_header");
                    let type_name = header
                        .as_str()
                        .strip_prefix("MSG:")
                        .unwrap_or(header.as_str())
                        .trim()
                        .to_string();

                    let mut message = ROSMessage::new(&type_name);
                    for line in inner {
                        if let Some(field) = parse_msg_line(line)? {
                            message.add_field(field);
                        }
                    }
                    schema.add_message(message);
                }
                _ => {}
            }
        }
    }

    crate::schema::builtin_types::inject_if_missing(&mut schema);
    Ok(schema)
}

/// Parse one `msg_line` pair into a field, or `None` for lines the grammar
/// let through but that carry no field (there currently are none, kept for
/// symmetry with how comments are filtered at the grammar level).
fn parse_msg_line(pair: pest::iterators::Pair<Rule>) -> Result<Option<ROSField>> {
    if pair.as_rule() != Rule::msg_line {
        return Ok(None);
    }

    let (line, _col) = pair.as_span().start_pos().line_col();
    let content = pair.as_str().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let space_pos = content.find(char::is_whitespace).ok_or_else(|| {
        IntrospectionError::DefinitionParseError {
            line,
            reason: format!("expected 'TYPE NAME' field declaration, got '{content}'"),
        }
    })?;

    let type_token = &content[..space_pos];
    let rest = content[space_pos..].trim_start();

    let field_type = ROSType::parse(type_token);

    let (field_name, constant_literal) = match rest.find('=') {
        Some(eq_pos) => {
            let name = rest[..eq_pos].trim().to_string();
            let literal = rest[eq_pos + 1..].trim().to_string();
            (name, Some(literal))
        }
        None => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (rest[..end].to_string(), None)
        }
    };

    if field_name.is_empty() {
        return Err(IntrospectionError::DefinitionParseError {
            line,
            reason: format!("missing field name in '{content}'"),
        });
    }

    match constant_literal {
        Some(literal) => {
            if field_type.array != ArrayKind::None || !field_type.is_builtin() {
                return Err(IntrospectionError::DefinitionParseError {
                    line,
                    reason: format!(
                        "constant '{field_name}' must be a scalar builtin field, got '{type_token}'"
                    ),
                });
            }
            Ok(Some(ROSField::constant(field_name, field_type, literal)))
        }
        None => Ok(Some(ROSField::field(field_name, field_type))),
    }
}
