//! `NodeUpgrade` status types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::NodePhase;
use crate::state::Summary;

/// Observed upgrade state of a single node.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub phase: NodePhase,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Timestamp of the last phase change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,

    /// Fields written by other writers (versions, attempt counters, ...).
    /// Kept verbatim so a typed round-trip does not drop them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeStatus {
    pub fn new(phase: NodePhase) -> Self {
        Self {
            phase,
            message: None,
            last_transition_time: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// `NodeUpgrade` status defines the observed state of the rollout.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpgradeStatus {
    /// Kubernetes version the nodes were on when planning started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,

    /// Planned upgrade path (e.g., `["1.27.0", "1.28.4"]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upgrade_path: Vec<String>,

    /// Per-node state, keyed by node name.
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeStatus>,

    /// Aggregate phase counts over `nodes`.
    #[serde(default)]
    pub summary: Summary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last observed generation of the spec.
    #[serde(default)]
    pub observed_generation: i64,
}

impl NodeUpgradeStatus {
    /// Recompute `summary` from `nodes`.
    pub fn refresh_summary(&mut self) {
        self.summary = crate::state::compute_summary(&self.nodes);
    }
}
