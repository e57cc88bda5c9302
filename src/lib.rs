//! kroll - planning and state-tracking core for rolling Kubernetes node upgrades.
//!
//! Computes the chain of minor versions to walk through, orders the nodes
//! to upgrade (control plane, canary workers, remaining workers) and folds
//! incremental per-node status updates into a status document. Everything
//! here is synchronous and side-effect free; talking to the API server and
//! touching nodes is left to the operator embedding this crate.

pub mod crd;
pub mod error;
pub mod planner;
pub mod state;
pub mod version;

pub use crd::{
    CanaryConfig, NodePhase, NodeStatus, NodeUpgrade, NodeUpgradeSpec, NodeUpgradeStatus,
};
pub use error::KrollError;
pub use planner::inventory::{NodeInventory, NodeRecord, StaticInventory};
pub use planner::{UpgradePlan, make_plan};
pub use state::{Summary, compute_summary, compute_summary_value, deep_merge, node_update};
pub use version::Version;
pub use version::path::{
    UpgradePath, calculate_upgrade_path, format_upgrade_path_message, is_patch_upgrade,
};
pub use version::policy::{
    PolicyConfig, PolicyViolation, get_upgrade_warnings, validate_version_string,
};
