//! Node selection and ordering for a rolling upgrade.
//!
//! Splits the selected nodes into control-plane and worker sets and moves
//! canary workers to the front of the worker queue.

pub mod inventory;

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::crd::{CanaryConfig, NodeUpgradeSpec};
use inventory::{NodeInventory, NodeRecord};

/// Label marking a control-plane node. Only the key matters.
pub const CONTROL_PLANE_LABEL: &str = "node-role.kubernetes.io/control-plane";

/// Pre-1.24 control-plane marker, still present on long-lived clusters.
pub const LEGACY_MASTER_LABEL: &str = "node-role.kubernetes.io/master";

/// Nodes to upgrade, grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradePlan {
    /// Target version carried through from the spec.
    pub target_version: String,
    pub control_plane_nodes: Vec<String>,
    /// Canary workers first, then the rest in discovery order.
    pub worker_nodes: Vec<String>,
    pub total: usize,
}

impl UpgradePlan {
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Control-plane nodes followed by workers.
    pub fn rollout_order(&self) -> impl Iterator<Item = &str> {
        self.control_plane_nodes
            .iter()
            .chain(&self.worker_nodes)
            .map(String::as_str)
    }
}

fn is_control_plane(node: &NodeRecord) -> bool {
    node.has_label(CONTROL_PLANE_LABEL) || node.has_label(LEGACY_MASTER_LABEL)
}

/// Build the node plan for `spec` from one inventory snapshot.
///
/// The inventory is queried exactly once; its error is returned as-is.
pub fn make_plan(spec: &NodeUpgradeSpec, inventory: &impl NodeInventory) -> Result<UpgradePlan> {
    let nodes = inventory.list_nodes()?;
    debug!("Inventory returned {} nodes", nodes.len());

    let selected: Vec<NodeRecord> = match spec.selector() {
        Some(selector) => {
            let before = nodes.len();
            let kept: Vec<NodeRecord> = nodes
                .into_iter()
                .filter(|n| n.matches_selector(selector))
                .collect();
            debug!(
                "Node selector {:?} kept {}/{} nodes",
                selector,
                kept.len(),
                before
            );
            kept
        }
        None => nodes,
    };

    let (control_plane, workers): (Vec<NodeRecord>, Vec<NodeRecord>) =
        selected.into_iter().partition(is_control_plane);

    let control_plane_nodes: Vec<String> = control_plane.into_iter().map(|n| n.name).collect();
    let mut worker_nodes: Vec<String> = workers.into_iter().map(|n| n.name).collect();

    if let Some(canary) = spec.active_canary() {
        worker_nodes = canary_first(worker_nodes, canary);
    }

    let total = control_plane_nodes.len() + worker_nodes.len();
    info!(
        "Planned upgrade to {}: {} control-plane, {} worker nodes",
        spec.target_version,
        control_plane_nodes.len(),
        worker_nodes.len()
    );

    Ok(UpgradePlan {
        target_version: spec.target_version.clone(),
        control_plane_nodes,
        worker_nodes,
        total,
    })
}

/// Move canary workers to the front in canary-list order.
///
/// Names that are not selected workers are ignored; duplicates count once.
fn canary_first(workers: Vec<String>, canary: &CanaryConfig) -> Vec<String> {
    let known: HashSet<&str> = workers.iter().map(String::as_str).collect();

    let mut picked: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<String> = Vec::with_capacity(workers.len());
    for name in &canary.nodes {
        if !known.contains(name.as_str()) {
            warn!("Canary node {} is not a selected worker, ignoring", name);
            continue;
        }
        if picked.insert(name.as_str()) {
            ordered.push(name.clone());
        }
    }

    ordered.extend(
        workers
            .iter()
            .filter(|w| !picked.contains(w.as_str()))
            .cloned(),
    );

    debug!("Canary order: {:?}", &ordered[..picked.len()]);
    ordered
}
