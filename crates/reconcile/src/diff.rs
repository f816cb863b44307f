//! Diff computation between desired and live resource mappings

use crate::types::ResourceMapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How two definitions of the same resource are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Changed iff the values differ as a whole
    FullEquality,
    /// Changed iff some field present on both sides differs
    ///
    /// Fields present on only one side are ignored, so fields the server
    /// adds on its own never show up as drift. The flip side: a desired
    /// field missing from live state is not detected unless another shared
    /// field also differs.
    PartialFields,
}

impl Strategy {
    /// Check if `desired` and `live` differ under this strategy
    pub fn differs(&self, desired: &Value, live: &Value) -> bool {
        match (self, desired, live) {
            (Self::PartialFields, Value::Object(want), Value::Object(have)) => want
                .iter()
                .any(|(field, value)| have.get(field).is_some_and(|current| current != value)),
            // Non-object values have no fields to compare individually
            _ => desired != live,
        }
    }
}

/// Partitioned difference between desired and live state
///
/// A name appears in at most one partition. `modify` carries the full
/// desired definition, not just the changed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    /// In desired, not live
    pub add: ResourceMapping,
    /// In live, not desired (carries the live definition)
    pub remove: ResourceMapping,
    /// In both, differing under the strategy
    pub modify: ResourceMapping,
}

impl Diff {
    /// Check if there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.modify.is_empty()
    }

    /// Number of names across all partitions
    pub fn len(&self) -> usize {
        self.add.len() + self.remove.len() + self.modify.len()
    }

    /// Counts per partition
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            additions: self.add.len(),
            removals: self.remove.len(),
            modifications: self.modify.len(),
        }
    }
}

/// Compute the diff of `desired` against `live`
pub fn compute(desired: &ResourceMapping, live: &ResourceMapping, strategy: Strategy) -> Diff {
    let mut diff = Diff::default();

    for (name, want) in desired {
        match live.get(name) {
            None => {
                diff.add.insert(name.clone(), want.clone());
            }
            Some(have) if strategy.differs(want, have) => {
                diff.modify.insert(name.clone(), want.clone());
            }
            Some(_) => {}
        }
    }

    for (name, have) in live {
        if !desired.contains_key(name) {
            diff.remove.insert(name.clone(), have.clone());
        }
    }

    diff
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources to modify
    pub modifications: usize,
}

impl DiffSummary {
    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &DiffSummary) {
        self.additions += other.additions;
        self.removals += other.removals;
        self.modifications += other.modifications;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::mapping_from_value;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn mapping(value: Value) -> ResourceMapping {
        mapping_from_value(value).unwrap()
    }

    fn keys(m: &ResourceMapping) -> BTreeSet<&str> {
        m.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_add_to_empty_live() {
        let desired = mapping(json!({"svc-a": {"type": "x"}}));
        let diff = compute(&desired, &ResourceMapping::new(), Strategy::PartialFields);

        assert_eq!(diff.add, desired);
        assert!(diff.remove.is_empty());
        assert!(diff.modify.is_empty());
    }

    #[test]
    fn test_full_equality_scenario() {
        let desired = mapping(json!({"p1": "rule-text"}));
        let live = mapping(json!({"p1": "old-text", "p2": "y"}));

        let diff = compute(&desired, &live, Strategy::FullEquality);
        assert!(diff.add.is_empty());
        assert_eq!(diff.remove, mapping(json!({"p2": "y"})));
        assert_eq!(diff.modify, mapping(json!({"p1": "rule-text"})));
    }

    #[test]
    fn test_full_equality_unchanged() {
        let desired = mapping(json!({"p1": "same"}));
        let diff = compute(&desired, &desired.clone(), Strategy::FullEquality);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_partial_ignores_one_sided_fields() {
        let desired = mapping(json!({"userpass": {"type": "userpass", "description": "people"}}));
        let live = mapping(json!({
            "userpass": {
                "type": "userpass",
                "local": false,
                "running_plugin_version": "v1.15.0+builtin.vault"
            }
        }));

        // `description` only in desired, extra fields only in live: untouched
        let diff = compute(&desired, &live, Strategy::PartialFields);
        assert!(diff.is_empty());

        // Full equality would flag it
        let diff = compute(&desired, &live, Strategy::FullEquality);
        assert_eq!(keys(&diff.modify), BTreeSet::from(["userpass"]));
    }

    #[test]
    fn test_partial_detects_shared_field_change() {
        let desired = mapping(json!({
            "alice": {"auth_method": "userpass", "password": "x", "token_ttl": 3600}
        }));
        let live = mapping(json!({
            "alice": {"auth_method": "userpass", "token_ttl": 0, "token_policies": []}
        }));

        let diff = compute(&desired, &live, Strategy::PartialFields);
        // The full desired definition is carried, not just the changed field
        assert_eq!(diff.modify["alice"], desired["alice"]);
        assert!(diff.add.is_empty());
        assert!(diff.remove.is_empty());
    }

    #[test]
    fn test_partial_nested_values_compared_whole() {
        let desired = mapping(json!({"token": {"config": {"max_lease_ttl": 0}}}));
        let live = mapping(json!({"token": {"config": {"max_lease_ttl": 0, "force_no_cache": false}}}));

        // `config` is one field; its nested maps differ as values
        let diff = compute(&desired, &live, Strategy::PartialFields);
        assert_eq!(keys(&diff.modify), BTreeSet::from(["token"]));
    }

    #[test]
    fn test_partial_falls_back_for_non_objects() {
        assert!(Strategy::PartialFields.differs(&json!("a"), &json!("b")));
        assert!(!Strategy::PartialFields.differs(&json!("a"), &json!("a")));
        assert!(Strategy::PartialFields.differs(&json!({"a": 1}), &json!("a")));
        assert!(Strategy::PartialFields.differs(&Value::Null, &json!({})));
    }

    #[test]
    fn test_partitions_match_key_sets() {
        let desired = mapping(json!({
            "a": {"v": 1}, "b": {"v": 2}, "c": {"v": 3}, "d": {"v": 4}
        }));
        let live = mapping(json!({
            "c": {"v": 3}, "d": {"v": 40}, "e": {"v": 5}, "f": {"v": 6}
        }));

        for strategy in [Strategy::FullEquality, Strategy::PartialFields] {
            let diff = compute(&desired, &live, strategy);

            let desired_keys = keys(&desired);
            let live_keys = keys(&live);
            let only_desired: BTreeSet<_> = desired_keys.difference(&live_keys).copied().collect();
            let only_live: BTreeSet<_> = live_keys.difference(&desired_keys).copied().collect();

            assert_eq!(keys(&diff.add), only_desired);
            assert_eq!(keys(&diff.remove), only_live);
            assert_eq!(keys(&diff.modify), BTreeSet::from(["d"]));
            assert_eq!(diff.len(), 5);
        }
    }

    #[test]
    fn test_remove_carries_live_definition() {
        let live = mapping(json!({"bob": {"auth_method": "people", "token_ttl": 0}}));
        let diff = compute(&ResourceMapping::new(), &live, Strategy::PartialFields);
        assert_eq!(diff.remove["bob"]["auth_method"], "people");
    }

    #[test]
    fn test_summary() {
        let desired = mapping(json!({"a": "1", "b": "2"}));
        let live = mapping(json!({"b": "3", "c": "4"}));
        let summary = compute(&desired, &live, Strategy::FullEquality).summary();

        assert_eq!(
            summary,
            DiffSummary {
                additions: 1,
                removals: 1,
                modifications: 1
            }
        );
        assert_eq!(summary.total(), 3);
        assert!(summary.has_changes());
        assert!(!DiffSummary::default().has_changes());
    }
}
