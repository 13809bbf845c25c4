// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The top-level facade: register a schema once per topic, then decode or
//! visit as many buffers against it as arrive.

use crate::core::flat::FlatMessage;
use crate::core::registry::SchemaRegistry;
use crate::core::value::Variant;
use crate::core::{deserializer, visitor, Result};
use crate::transform::{RenameRule, Renamer};

/// Default cap on array element counts, matching the upstream library this
/// crate's behavior is modeled on. Call sites needing a different bound pass
/// it explicitly to [`Parser::deserialize`]/[`Parser::visit`] instead of
/// relying on this constant.
pub const DEFAULT_MAX_ARRAY_SIZE: usize = 100;

/// Owns one [`SchemaRegistry`] and one [`Renamer`], the two pieces of state
/// that outlive a single `deserialize`/`visit` call.
#[derive(Default)]
pub struct Parser {
    registry: SchemaRegistry,
    renamer: Renamer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            registry: SchemaRegistry::new(),
            renamer: Renamer::new(),
        }
    }

    /// Parse and compile `definition_text` for `root_type`, storing it under
    /// `topic_id`. See [`SchemaRegistry::register`] for the idempotency rule.
    pub fn register(&self, topic_id: &str, root_type: &str, definition_text: &str) -> Result<()> {
        self.registry.register(topic_id, root_type, definition_text)
    }

    /// Deserialize `buffer` against the schema registered for `topic_id`,
    /// writing the flattened result into `flat` (cleared first). Every
    /// emitted path is rooted at `topic_id`, not the message's type name.
    pub fn deserialize(
        &self,
        topic_id: &str,
        buffer: &[u8],
        flat: &mut FlatMessage,
        max_array_size: usize,
    ) -> Result<()> {
        let plan = self.registry.plan(topic_id)?;
        deserializer::deserialize(&plan, buffer, flat, topic_id, max_array_size)
    }

    /// Locate every occurrence of `target_type` inside `buffer` as decoded
    /// by `topic_id`'s schema and hand each one to `callback` in turn as a
    /// mutable byte window. Returns `Ok(false)` if `target_type` never
    /// occurs.
    pub fn visit<F>(
        &self,
        topic_id: &str,
        target_type: &str,
        buffer: &mut [u8],
        max_array_size: usize,
        callback: F,
    ) -> Result<bool>
    where
        F: FnMut(&mut [u8]) -> Result<()>,
    {
        let plan = self.registry.plan(topic_id)?;
        visitor::visit(&plan, target_type, buffer, max_array_size, callback)
    }

    /// Register a path-joining rename rule (see [`crate::transform::rename`]).
    pub fn register_rename_rule(&mut self, rule: RenameRule) {
        self.renamer.register_rule(rule);
    }

    /// Apply every registered rename rule to `flat`'s value entries.
    pub fn apply_name_transform(&self, flat: &FlatMessage) -> Vec<(String, Variant)> {
        self.renamer.apply(flat)
    }
}
