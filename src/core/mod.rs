// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robocodec.
//!
//! This module provides the foundational types for the library:
//! - [`error::IntrospectionError`] - the error taxonomy
//! - [`value::Variant`] - a tagged numeric union for decoded scalars
//! - [`flat::FlatMessage`] - the flattened, ordered decode output
//! - [`cursor::Cursor`] - little-endian, unaligned buffer reader
//! - [`plan::CompiledMessage`] - a schema resolved into a traversal tree
//! - [`registry::SchemaRegistry`] - topic_id -> compiled plan

pub mod cursor;
pub mod deserializer;
pub mod error;
pub mod flat;
pub mod plan;
pub mod registry;
pub mod value;
pub mod visitor;

pub use error::{IntrospectionError, Result};
pub use flat::FlatMessage;
pub use plan::CompiledMessage;
pub use registry::SchemaRegistry;
pub use value::{RosTime, Variant};
