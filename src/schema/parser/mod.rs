// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema parser implementations.

pub mod msg_parser;

use crate::core::Result;
use crate::schema::ast::MessageSchema;

/// Parse ROS1 `.msg`-style multi-definition text into a `MessageSchema`
/// whose root type is `root_type_name`.
pub fn parse_schema(root_type_name: &str, definition: &str) -> Result<MessageSchema> {
    msg_parser::parse(root_type_name, definition)
}
