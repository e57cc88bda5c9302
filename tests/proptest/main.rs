// Test code is allowed to panic on failure
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

//! Property-based tests for upgrade paths, node plans and status merging.
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. Upgrade paths never skip a minor version and end at the target
//! 2. Node plans are a disjoint split of the selected nodes
//! 3. Deep merge keeps untouched keys and is idempotent
//! 4. Summaries always account for every node

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use kroll::planner::CONTROL_PLANE_LABEL;
use kroll::{
    CanaryConfig, NodePhase, NodeRecord, NodeStatus, NodeUpgradeSpec, StaticInventory, Version,
    calculate_upgrade_path, compute_summary, deep_merge, make_plan,
};

// =============================================================================
// Strategy generators
// =============================================================================

/// Generate a 1.x version
fn version() -> impl Strategy<Value = Version> {
    (0..40u32, 0..20u32).prop_map(|(minor, patch)| Version::new(1, minor, patch))
}

fn phase() -> impl Strategy<Value = NodePhase> {
    prop_oneof![
        Just(NodePhase::Pending),
        Just(NodePhase::Upgrading),
        Just(NodePhase::Draining),
        Just(NodePhase::Completed),
        Just(NodePhase::Failed),
    ]
}

/// Generate a node inventory with unique names, random role and env label
fn inventory() -> impl Strategy<Value = Vec<NodeRecord>> {
    prop::collection::vec(
        (any::<bool>(), prop_oneof![Just("prod"), Just("dev")]),
        0..12,
    )
    .prop_map(|nodes| {
        nodes
            .into_iter()
            .enumerate()
            .map(|(i, (control_plane, env))| {
                let node = NodeRecord::new(format!("node-{i}")).with_label("env", env);
                if control_plane {
                    node.with_label(CONTROL_PLANE_LABEL, "")
                } else {
                    node
                }
            })
            .collect()
    })
}

/// Generate a nested JSON object of bounded depth
fn json_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (0..100i64).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-d]", inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", json_tree(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Every key path of `base` absent from `update` must survive with its value.
fn assert_untouched_preserved(base: &Value, update: &Value, merged: &Value) {
    let (Some(base), Some(merged)) = (base.as_object(), merged.as_object()) else {
        return;
    };
    let update = update.as_object();
    for (key, value) in base {
        match update.and_then(|u| u.get(key)) {
            None => assert_eq!(merged.get(key), Some(value), "key {key} lost"),
            Some(next) if value.is_object() && next.is_object() => {
                assert_untouched_preserved(value, next, &merged[key]);
            }
            Some(next) => assert_eq!(merged.get(key), Some(next)),
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: a forward path ends at the target and steps one minor at a time
    #[test]
    fn prop_path_reaches_target(a in version(), b in version()) {
        let (current, target) = if a <= b { (a, b) } else { (b, a) };
        let path = calculate_upgrade_path(&current, &target).unwrap();

        if current == target {
            prop_assert!(path.is_empty());
        } else {
            prop_assert_eq!(path.last(), Some(&target));
            prop_assert!(!path.contains(&current));

            let mut previous = current;
            for step in path.iter() {
                prop_assert!(*step > previous);
                prop_assert!(step.minor - previous.minor <= 1);
                previous = *step;
            }
        }
    }

    /// Property: the path length equals the minor gap for multi-minor jumps
    #[test]
    fn prop_path_length_matches_gap(current in version(), extra in 2..10u32, patch in 0..10u32) {
        let target = Version::new(1, current.minor + extra, patch);
        let path = calculate_upgrade_path(&current, &target).unwrap();

        prop_assert_eq!(path.len() as u32, extra);
        for step in &path[..path.len() - 1] {
            prop_assert_eq!(step.patch, 0);
        }
        prop_assert_eq!(path[path.len() - 1], target);
    }

    /// Property: downgrades and no-ops never produce steps
    #[test]
    fn prop_no_downgrade(a in version(), b in version()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calculate_upgrade_path(&high, &low).unwrap().is_empty());
        prop_assert!(calculate_upgrade_path(&high, &high).unwrap().is_empty());
    }

    /// Property: the plan is a disjoint split of the selector-matching nodes
    #[test]
    fn prop_plan_partitions_selected_nodes(nodes in inventory(), use_selector in any::<bool>()) {
        let selector = BTreeMap::from([("env".to_string(), "prod".to_string())]);
        let spec = NodeUpgradeSpec {
            target_version: "1.28.0".to_string(),
            node_selector: use_selector.then(|| selector.clone()),
            ..Default::default()
        };

        let plan = make_plan(&spec, &StaticInventory::new(nodes.clone())).unwrap();

        let expected: HashSet<String> = nodes
            .iter()
            .filter(|n| !use_selector || n.matches_selector(&selector))
            .map(|n| n.name.clone())
            .collect();
        let cp: HashSet<String> = plan.control_plane_nodes.iter().cloned().collect();
        let workers: HashSet<String> = plan.worker_nodes.iter().cloned().collect();

        prop_assert!(cp.is_disjoint(&workers));
        prop_assert_eq!(cp.union(&workers).cloned().collect::<HashSet<_>>(), expected);
        prop_assert_eq!(plan.total, cp.len() + workers.len());
    }

    /// Property: canary reordering is a permutation of the worker set
    #[test]
    fn prop_canary_is_permutation(nodes in inventory(), picks in prop::collection::vec(0..15usize, 0..5)) {
        let base_spec = NodeUpgradeSpec {
            target_version: "1.28.0".to_string(),
            ..Default::default()
        };
        let canary_spec = NodeUpgradeSpec {
            canary: Some(CanaryConfig {
                enabled: true,
                nodes: picks.iter().map(|i| format!("node-{i}")).collect(),
            }),
            ..base_spec.clone()
        };
        let inventory = StaticInventory::new(nodes);

        let plain = make_plan(&base_spec, &inventory).unwrap();
        let canary = make_plan(&canary_spec, &inventory).unwrap();

        let mut a = plain.worker_nodes.clone();
        let mut b = canary.worker_nodes.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
        prop_assert_eq!(plain.control_plane_nodes, canary.control_plane_nodes);
    }

    /// Property: merge keeps every untouched key and applies every update key
    #[test]
    fn prop_merge_preserves_untouched(base in json_object(), update in json_object()) {
        let merged = deep_merge(&base, &update);
        assert_untouched_preserved(&base, &update, &merged);

        for key in update.as_object().unwrap().keys() {
            prop_assert!(merged.get(key).is_some());
        }
    }

    /// Property: applying the same update twice equals applying it once
    #[test]
    fn prop_merge_idempotent(base in json_object(), update in json_object()) {
        let once = deep_merge(&base, &update);
        prop_assert_eq!(deep_merge(&once, &update), once);
    }

    /// Property: disjoint key sets merge as a plain union
    #[test]
    fn prop_merge_disjoint_is_union(left in json_tree(), right in json_tree()) {
        let base = json!({ "left": left });
        let update = json!({ "right": right });
        prop_assert_eq!(
            deep_merge(&base, &update),
            json!({ "left": base["left"].clone(), "right": update["right"].clone() })
        );
    }

    /// Property: summary buckets always add up to the total
    #[test]
    fn prop_summary_adds_up(phases in prop::collection::vec(phase(), 0..30)) {
        let nodes: BTreeMap<String, NodeStatus> = phases
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("node-{i}"), NodeStatus::new(*p)))
            .collect();

        let summary = compute_summary(&nodes);

        prop_assert_eq!(summary.total, phases.len());
        prop_assert_eq!(
            summary.completed + summary.pending + summary.failed + summary.upgrading,
            summary.total
        );
    }
}
