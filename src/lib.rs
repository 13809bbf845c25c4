// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robocodec
//!
//! Introspection-based deserialization for ROS1 binary messages: given only
//! a topic's textual `.msg` IDL definition and a raw byte buffer, produce a
//! flattened set of key/value pairs without any compile-time knowledge of
//! the message type.
//!
//! ## Example
//!
//! ```
//! use robocodec::{FlatMessage, Parser, DEFAULT_MAX_ARRAY_SIZE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = Parser::new();
//! parser.register("/status", "Status", "int32 code\nstring message")?;
//!
//! let mut buffer = Vec::new();
//! buffer.extend_from_slice(&0i32.to_le_bytes());
//! buffer.extend_from_slice(&5u32.to_le_bytes());
//! buffer.extend_from_slice(b"ready");
//!
//! let mut flat = FlatMessage::new();
//! parser.deserialize("/status", &buffer, &mut flat, DEFAULT_MAX_ARRAY_SIZE)?;
//! assert_eq!(flat.value[0].0, "/status/code");
//! assert_eq!(flat.name[0].1, "ready");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod parser;
pub mod schema;
pub mod transform;

pub use core::error::{IntrospectionError, Result};
pub use core::flat::FlatMessage;
pub use core::value::{RosTime, Variant};
pub use parser::{Parser, DEFAULT_MAX_ARRAY_SIZE};
pub use transform::{RenameRule, Renamer};
