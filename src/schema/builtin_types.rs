// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The one builtin message type ROS1 wire definitions assume without
//! spelling out: `std_msgs/Header`. Referencing the bare `Header` token (see
//! `ROSType::parse`) resolves to this type even when the definition text
//! supplied at registration never defines it explicitly.

use crate::schema::ast::{ROSField, ROSMessage, ROSType};

/// `std_msgs/Header`: `uint32 seq`, `time stamp`, `string frame_id`.
pub fn header() -> ROSMessage {
    let mut msg = ROSMessage::new("std_msgs/Header");
    msg.add_field(ROSField::field("seq", ROSType::parse("uint32")));
    msg.add_field(ROSField::field("stamp", ROSType::parse("time")));
    msg.add_field(ROSField::field("frame_id", ROSType::parse("string")));
    msg
}

/// Insert `std_msgs/Header` into a schema if something in it refers to
/// `Header`/`std_msgs/Header` but no block defined it explicitly.
pub fn inject_if_missing(schema: &mut crate::schema::ast::MessageSchema) {
    if !schema.messages.contains_key("std_msgs/Header")
        && schema
            .unresolved_references()
            .iter()
            .any(|name| name == "std_msgs/Header")
    {
        schema.add_message(header());
    }
}
