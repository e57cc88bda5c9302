//! Status document merging and progress summaries.
//!
//! The reconcile loop observes node transitions one at a time and records
//! each as a small update fragment. Fragments are folded into the previous
//! status document with [`deep_merge`], so fields written by other steps
//! survive partial, repeated and out-of-order updates.

use std::collections::BTreeMap;

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crd::{NodePhase, NodeStatus};
use crate::error::KrollError;

/// Aggregate phase counts over all tracked nodes.
///
/// `Draining` is counted under `upgrading`.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub upgrading: usize,
    pub pending: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, phase: NodePhase) {
        self.total += 1;
        match phase {
            NodePhase::Pending => self.pending += 1,
            NodePhase::Upgrading | NodePhase::Draining => self.upgrading += 1,
            NodePhase::Completed => self.completed += 1,
            NodePhase::Failed => self.failed += 1,
        }
    }

    /// Every tracked node reached a terminal phase.
    pub const fn is_finished(&self) -> bool {
        self.completed + self.failed == self.total
    }

    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Recursively merge `update` into a copy of `base`.
///
/// For every key in `update`: when both sides hold objects they are merged
/// recursively, otherwise the update's value wins. Keys present only in
/// `base` are kept at every depth. If either top-level value is not an
/// object, the result is `update`. Neither input is modified.
pub fn deep_merge(base: &Value, update: &Value) -> Value {
    match (base, update) {
        (Value::Object(base_obj), Value::Object(update_obj)) => {
            Value::Object(merge_objects(base_obj, update_obj))
        }
        _ => update.clone(),
    }
}

fn merge_objects(base: &Map<String, Value>, update: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in update {
        let next = match (merged.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(merge_objects(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Count nodes per phase.
pub fn compute_summary(nodes: &BTreeMap<String, NodeStatus>) -> Summary {
    let mut summary = Summary::default();
    for status in nodes.values() {
        summary.record(status.phase);
    }
    summary
}

/// Count nodes per phase over an untyped `nodes` subtree.
///
/// Fails on the first entry whose `phase` is missing or not one of the
/// known phases, rather than leaving it out of the counts. A missing
/// (`null`) subtree is empty; any other non-object value is rejected.
pub fn compute_summary_value(nodes: &Value) -> Result<Summary, KrollError> {
    let mut summary = Summary::default();
    let entries = match nodes {
        Value::Object(entries) => entries,
        Value::Null => return Ok(summary),
        other => {
            let kind = json_kind(other);
            return Err(KrollError::InvalidStatus(format!("nodes must be an object, got {kind}")));
        }
    };

    for (node, status) in entries {
        let raw = status.get("phase").and_then(Value::as_str);
        let phase = raw
            .and_then(NodePhase::from_name)
            .ok_or_else(|| KrollError::UnknownPhase {
                node: node.clone(),
                phase: raw.unwrap_or("<missing>").to_string(),
            })?;
        summary.record(phase);
    }

    Ok(summary)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build the update fragment recording a phase transition for `node`.
///
/// The fragment has the shape `{"nodes": {<node>: {...}}}` and only names
/// the fields being changed, so merging it keeps everything else.
pub fn node_update(node: &str, phase: NodePhase, message: Option<&str>) -> Value {
    let mut fields = Map::new();
    fields.insert("phase".to_string(), Value::from(phase.as_str()));
    if let Some(message) = message {
        fields.insert("message".to_string(), Value::from(message));
    }
    fields.insert(
        "lastTransitionTime".to_string(),
        Value::from(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
    );

    let mut nodes = Map::new();
    nodes.insert(node.to_string(), Value::Object(fields));

    let mut root = Map::new();
    root.insert("nodes".to_string(), Value::Object(nodes));
    Value::Object(root)
}
