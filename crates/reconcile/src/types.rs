//! Core types for declarative reconciliation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Attributes of a single resource, field name to value
pub type AttributeMap = Map<String, Value>;

/// Resource name to its definition
///
/// Values are usually attribute maps; some kinds (policies) use plain
/// strings. A `BTreeMap` keeps reports and call order deterministic.
pub type ResourceMapping = BTreeMap<String, Value>;

/// Overlay `baseline` onto `desired`
///
/// Baseline entries always win: a desired entry with the same name is
/// replaced, never merged.
pub fn merge_baseline(mut desired: ResourceMapping, baseline: &ResourceMapping) -> ResourceMapping {
    for (name, value) in baseline {
        desired.insert(name.clone(), value.clone());
    }
    desired
}

/// Build a mapping from a JSON object, e.g. a parsed document section
///
/// `null` yields an empty mapping; any other non-object yields `None`.
pub fn mapping_from_value(value: Value) -> Option<ResourceMapping> {
    match value {
        Value::Null => Some(ResourceMapping::new()),
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// Kind of remote operation derived from a diff partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// From the `add` partition
    Create,
    /// From the `modify` partition
    Update,
    /// From the `remove` partition
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// A single remote call produced by planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCall {
    pub action: Action,
    /// Resource name from the diff
    pub name: String,
    /// Full API path (prefix + routed segment)
    pub path: String,
    /// Body to send; never contains auxiliary routing fields
    pub payload: Option<Value>,
}

/// Result of dispatching a planned call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Resource was removed
    Removed,
    /// Call was not sent
    Skipped { reason: String },
}

impl ApplyResult {
    /// Result of a successful call with the given action
    pub fn from_action(action: Action) -> Self {
        match action {
            Action::Create => Self::Created,
            Action::Update => Self::Modified,
            Action::Delete => Self::Removed,
        }
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.modified += other.modified;
        self.removed += other.removed;
        self.skipped += other.skipped;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Plan and report, but send nothing
    pub dry_run: bool,
}
