// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Thread-safe registry mapping a `topic_id` to its parsed schema and
//! compiled traversal plan.
//!
//! Registration is idempotent: registering the same `topic_id` again with
//! byte-identical definition text is a no-op; registering it with different
//! text replaces the previous entry. Either way the new definition's
//! reference closure is verified complete before anything is committed, so
//! a failed registration never disturbs a previously-registered schema.

use crate::core::error::IntrospectionError;
use crate::core::plan::{self, CompiledMessage};
use crate::core::Result;
use crate::schema::ast::MessageSchema;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::RwLock;

struct Entry {
    definition_text: String,
    plan: Rc<CompiledMessage>,
}

/// Registry of compiled message schemas, keyed by topic identifier.
///
/// Reads (`plan`) take a shared lock; writes (`register`) take an exclusive
/// lock. `Entry::plan` is an `Rc`, so the registry itself is `!Sync` across
/// threads that need to hold a plan past the lock guard's lifetime — callers
/// needing that should clone the `Rc` while holding the read lock, which
/// `plan()` already does.
pub struct SchemaRegistry {
    inner: RwLock<HashMap<String, Entry>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Parse, resolve, and compile `definition_text` for `root_type`, then
    /// store it under `topic_id`. No-ops if `topic_id` is already registered
    /// with identical text.
    pub fn register(&self, topic_id: &str, root_type: &str, definition_text: &str) -> Result<()> {
        {
            let existing = self
                .inner
                .read()
                .expect("schema registry lock poisoned");
            if let Some(entry) = existing.get(topic_id) {
                if entry.definition_text == definition_text {
                    tracing::debug!(topic_id, "schema already registered with identical text");
                    return Ok(());
                }
            }
        }

        let schema = crate::schema::parser::parse_schema(root_type, definition_text).map_err(|e| {
            tracing::warn!(topic_id, error = %e, "definition parse failed");
            e
        })?;

        let unresolved = schema.unresolved_references();
        if let Some(name) = unresolved.into_iter().next() {
            let err = IntrospectionError::UnresolvedType { name };
            tracing::warn!(topic_id, error = %err, "schema reference closure incomplete");
            return Err(err);
        }

        let plan = plan::compile(&schema).map_err(|e| {
            tracing::warn!(topic_id, error = %e, "failed to compile traversal plan");
            e
        })?;

        let mut guard = self.inner.write().expect("schema registry lock poisoned");
        guard.insert(
            topic_id.to_string(),
            Entry {
                definition_text: definition_text.to_string(),
                plan,
            },
        );
        tracing::info!(topic_id, root_type, "schema registered");
        Ok(())
    }

    /// Fetch the compiled plan for `topic_id`.
    pub fn plan(&self, topic_id: &str) -> Result<Rc<CompiledMessage>> {
        let guard = self.inner.read().expect("schema registry lock poisoned");
        guard
            .get(topic_id)
            .map(|entry| entry.plan.clone())
            .ok_or_else(|| IntrospectionError::SchemaNotFound {
                topic_id: topic_id.to_string(),
            })
    }

    pub fn contains(&self, topic_id: &str) -> bool {
        self.inner
            .read()
            .expect("schema registry lock poisoned")
            .contains_key(topic_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("schema registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// `MessageSchema` is re-exported here only so downstream modules can name it
// via `crate::core::registry::MessageSchema` alongside `SchemaRegistry`
// without an extra `use` of `crate::schema::ast`.
pub use crate::schema::ast::MessageSchema as RegisteredMessageSchema;

#[cfg(test)]
mod tests {
    use super::*;

    const JOINT_STATE_DEF: &str = "\
Header header
string[] name
float64[] position
float64[] velocity
float64[] effort
====
MSG: std_msgs/Header
uint32 seq
time stamp
string frame_id
";

    #[test]
    fn registers_and_fetches_plan() {
        let registry = SchemaRegistry::new();
        registry
            .register("/joint_states", "JointState", JOINT_STATE_DEF)
            .unwrap();
        let plan = registry.plan("/joint_states").unwrap();
        assert_eq!(plan.type_name, "JointState");
    }

    #[test]
    fn missing_topic_errors() {
        let registry = SchemaRegistry::new();
        let err = registry.plan("/nope").unwrap_err();
        assert!(matches!(err, IntrospectionError::SchemaNotFound { .. }));
    }

    #[test]
    fn reregistering_identical_text_is_idempotent() {
        let registry = SchemaRegistry::new();
        registry
            .register("/joint_states", "JointState", JOINT_STATE_DEF)
            .unwrap();
        registry
            .register("/joint_states", "JointState", JOINT_STATE_DEF)
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_different_text_replaces() {
        let registry = SchemaRegistry::new();
        registry
            .register("/topic", "Foo", "int32 x")
            .unwrap();
        registry.register("/topic", "Foo", "int32 y").unwrap();
        let plan = registry.plan("/topic").unwrap();
        assert_eq!(plan.fields[0].name, "y");
    }

    #[test]
    fn incomplete_closure_is_rejected() {
        let registry = SchemaRegistry::new();
        let err = registry
            .register("/topic", "Foo", "other_pkg/Missing field")
            .unwrap_err();
        assert!(matches!(err, IntrospectionError::UnresolvedType { .. }));
    }

    #[test]
    fn failed_registration_does_not_disturb_existing_entry() {
        let registry = SchemaRegistry::new();
        registry.register("/topic", "Foo", "int32 x").unwrap();
        let _ = registry.register("/topic", "Bar", "other_pkg/Missing field");
        let plan = registry.plan("/topic").unwrap();
        assert_eq!(plan.type_name, "Foo");
    }
}
