//! Custom error types for kroll.

use thiserror::Error;

/// Errors that can occur while planning or tracking a node upgrade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KrollError {
    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    #[error("Upgrade not possible: {0}")]
    UpgradeNotPossible(String),

    #[error("Unknown phase for node {node}: {phase}")]
    UnknownPhase { node: String, phase: String },

    #[error("Invalid status document: {0}")]
    InvalidStatus(String),

    #[error("Node inventory error: {0}")]
    NodeInventory(String),
}

impl KrollError {
    /// Returns true if this error is transient and the caller may retry.
    ///
    /// Only inventory failures qualify; everything else is a property of the
    /// input and will fail the same way again.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NodeInventory(_))
    }
}
