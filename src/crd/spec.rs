//! `NodeUpgrade` spec types.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::status::NodeUpgradeStatus;
use crate::version::Version;
use crate::version::policy::{PolicyConfig, PolicyViolation};

/// `NodeUpgrade` spec defines the desired state of a rolling node upgrade.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "kroll.io",
    version = "v1alpha1",
    kind = "NodeUpgrade",
    status = "NodeUpgradeStatus",
    printcolumn = r#"{"name":"TARGET","type":"string","jsonPath":".spec.targetVersion"}"#,
    printcolumn = r#"{"name":"TOTAL","type":"integer","jsonPath":".status.summary.total"}"#,
    printcolumn = r#"{"name":"DONE","type":"integer","jsonPath":".status.summary.completed"}"#,
    printcolumn = r#"{"name":"FAILED","type":"integer","jsonPath":".status.summary.failed"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpgradeSpec {
    /// Target Kubernetes version (e.g., "1.28.4").
    pub target_version: String,

    /// Only nodes carrying every one of these labels are upgraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Worker nodes to upgrade ahead of the rest of the fleet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canary: Option<CanaryConfig>,

    /// Version policy overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyConfig>,
}

/// Canary configuration.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanaryConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Worker node names, upgraded first and in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
}

impl CanaryConfig {
    /// Canary ordering applies only when enabled with at least one node.
    pub const fn is_active(&self) -> bool {
        self.enabled && !self.nodes.is_empty()
    }
}

impl NodeUpgradeSpec {
    /// Effective version policy: spec overrides or the defaults.
    pub fn policy(&self) -> PolicyConfig {
        self.policy.clone().unwrap_or_default()
    }

    /// Validate and parse `targetVersion` under the effective policy.
    pub fn target(&self) -> Result<Version, PolicyViolation> {
        self.policy().validate(&self.target_version)
    }

    /// Node selector, treating an empty map the same as no selector.
    pub fn selector(&self) -> Option<&BTreeMap<String, String>> {
        self.node_selector.as_ref().filter(|s| !s.is_empty())
    }

    /// Canary configuration when it affects ordering.
    pub fn active_canary(&self) -> Option<&CanaryConfig> {
        self.canary.as_ref().filter(|c| c.is_active())
    }
}
