//! Enum types for per-node upgrade phases.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single node's upgrade.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, JsonSchema)]
pub enum NodePhase {
    Pending,
    Upgrading,
    Draining,
    Completed,
    Failed,
}

impl NodePhase {
    /// Every known phase, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Draining,
        Self::Upgrading,
        Self::Completed,
        Self::Failed,
    ];

    /// Parse the wire name of a phase. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.as_str() == name)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Upgrading => "Upgrading",
            Self::Draining => "Draining",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// The node is actively being worked on (cordoned, drained or upgraded).
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Upgrading | Self::Draining)
    }

    /// No further transitions are expected.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for NodePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
