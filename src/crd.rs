//! `NodeUpgrade` CRD type definition.

pub mod spec;
pub mod status;
pub mod types;

pub use spec::{CanaryConfig, NodeUpgrade, NodeUpgradeSpec};
pub use status::{NodeStatus, NodeUpgradeStatus};
pub use types::NodePhase;
