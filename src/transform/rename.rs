// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Joins array-indexed value paths to a parallel array of names sharing the
//! same parent and index.
//!
//! The canonical case is `sensor_msgs/JointState`: `name[i]` names the joint
//! that `position[i]`/`velocity[i]`/`effort[i]` describe. A
//! [`FlatMessage`] has no idea `name` and `position` are related — they are
//! two independently-flattened arrays. A [`Renamer`] rule records that
//! relationship so a caller can ask for `JointState/position/shoulder_pan`
//! instead of `JointState/position.0`.

use crate::core::flat::FlatMessage;
use crate::core::value::Variant;
use std::collections::HashMap;

/// One registrable relationship: `name_field`'s array entries provide
/// human-readable labels for the same-indexed entries of each field in
/// `value_fields`, all siblings under the same parent path.
#[derive(Debug, Clone)]
pub struct RenameRule {
    pub name_field: String,
    pub value_fields: Vec<String>,
}

impl RenameRule {
    pub fn new(name_field: impl Into<String>, value_fields: Vec<String>) -> Self {
        RenameRule {
            name_field: name_field.into(),
            value_fields,
        }
    }

    /// The rule JointState itself uses: `name` labels `position`, `velocity`,
    /// and `effort`.
    pub fn joint_state() -> Self {
        RenameRule::new(
            "name",
            vec![
                "position".to_string(),
                "velocity".to_string(),
                "effort".to_string(),
            ],
        )
    }
}

/// A set of registered rename rules, applied against a decoded
/// [`FlatMessage`] to produce paths with array indices replaced by names.
#[derive(Debug, Clone, Default)]
pub struct Renamer {
    rules: Vec<RenameRule>,
}

impl Renamer {
    pub fn new() -> Self {
        Renamer { rules: Vec::new() }
    }

    pub fn register_rule(&mut self, rule: RenameRule) {
        self.rules.push(rule);
    }

    /// Produce the value vector with every entry whose path matches a
    /// registered rule's `value_fields` renamed from `.{index}` to
    /// `/{name}`. Entries with no matching rule, or whose parallel name
    /// entry is missing, pass through with their original path.
    pub fn apply(&self, flat: &FlatMessage) -> Vec<(String, Variant)> {
        let names = self.collect_names(flat);

        flat.value
            .iter()
            .map(|(path, value)| {
                let renamed = split_indexed(path).and_then(|(parent, field, index)| {
                    self.rules
                        .iter()
                        .find(|rule| rule.value_fields.iter().any(|f| f == field))
                        .and_then(|rule| names.get(&(parent.to_string(), rule.name_field.clone(), index)))
                        .map(|name| format!("{parent}/{field}/{name}"))
                });
                (renamed.unwrap_or_else(|| path.clone()), *value)
            })
            .collect()
    }

    fn collect_names(&self, flat: &FlatMessage) -> HashMap<(String, String, usize), String> {
        let mut names = HashMap::new();
        for (path, value) in &flat.name {
            if let Some((parent, field, index)) = split_indexed(path) {
                if self.rules.iter().any(|rule| rule.name_field == field) {
                    names.insert((parent.to_string(), field.to_string(), index), value.clone());
                }
            }
        }
        names
    }
}

/// Split `"parent/field.index"` into its three parts. Returns `None` if the
/// trailing segment has no `.N` suffix (a non-array field).
fn split_indexed(path: &str) -> Option<(&str, &str, usize)> {
    let (parent, tail) = match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    };
    let dot = tail.rfind('.')?;
    let field = &tail[..dot];
    let index: usize = tail[dot + 1..].parse().ok()?;
    Some((parent, field, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint_state_flat() -> FlatMessage {
        let mut flat = FlatMessage::new();
        flat.push_name("JointState/name.0", "shoulder_pan");
        flat.push_name("JointState/name.1", "elbow");
        flat.push_value("JointState/position.0", Variant::Float64(1.5));
        flat.push_value("JointState/position.1", Variant::Float64(2.5));
        flat.push_value("JointState/velocity.0", Variant::Float64(0.1));
        flat
    }

    #[test]
    fn renames_value_paths_using_parallel_name_array() {
        let mut renamer = Renamer::new();
        renamer.register_rule(RenameRule::joint_state());

        let renamed = renamer.apply(&joint_state_flat());
        assert_eq!(renamed[0].0, "JointState/position/shoulder_pan");
        assert_eq!(renamed[1].0, "JointState/position/elbow");
        assert_eq!(renamed[2].0, "JointState/velocity/shoulder_pan");
    }

    #[test]
    fn unmatched_field_passes_through_unchanged() {
        let mut flat = FlatMessage::new();
        flat.push_value("Other/value.0", Variant::Int32(1));
        let mut renamer = Renamer::new();
        renamer.register_rule(RenameRule::joint_state());

        let renamed = renamer.apply(&flat);
        assert_eq!(renamed[0].0, "Other/value.0");
    }

    #[test]
    fn missing_name_entry_falls_back_to_original_path() {
        let mut flat = FlatMessage::new();
        flat.push_value("JointState/position.5", Variant::Float64(9.0));
        let mut renamer = Renamer::new();
        renamer.register_rule(RenameRule::joint_state());

        let renamed = renamer.apply(&flat);
        assert_eq!(renamed[0].0, "JointState/position.5");
    }

    #[test]
    fn scalar_fields_without_index_are_untouched() {
        let mut flat = FlatMessage::new();
        flat.push_value("JointState/header/seq", Variant::UInt32(1));
        let renamer = Renamer::new();
        let renamed = renamer.apply(&flat);
        assert_eq!(renamed[0].0, "JointState/header/seq");
    }
}
