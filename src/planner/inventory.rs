//! Node inventory snapshots consumed by the planner.

use std::collections::BTreeMap;

use anyhow::Result;
use k8s_openapi::api::core::v1::Node;

use crate::error::KrollError;

/// Name and labels of a cluster node at the time of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// True if every selector entry is present on the node with an equal value.
    pub fn matches_selector(&self, selector: &BTreeMap<String, String>) -> bool {
        selector
            .iter()
            .all(|(key, value)| self.labels.get(key) == Some(value))
    }

    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }
}

impl TryFrom<&Node> for NodeRecord {
    type Error = KrollError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        let name = node.metadata.name.clone().ok_or_else(|| {
            KrollError::NodeInventory("Node without metadata.name".to_string())
        })?;

        Ok(Self {
            name,
            labels: node.metadata.labels.clone().unwrap_or_default(),
        })
    }
}

/// Source of the current cluster node set.
///
/// Called once per plan. Errors are returned to the caller unchanged.
pub trait NodeInventory {
    fn list_nodes(&self) -> Result<Vec<NodeRecord>>;
}

impl<F> NodeInventory for F
where
    F: Fn() -> Result<Vec<NodeRecord>>,
{
    fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        self()
    }
}

/// An inventory over an already-fetched list of nodes.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    nodes: Vec<NodeRecord>,
}

impl StaticInventory {
    pub const fn new(nodes: Vec<NodeRecord>) -> Self {
        Self { nodes }
    }

    /// Snapshot a list of `Node` objects as returned by the API server.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Result<Self, KrollError> {
        let nodes = nodes
            .into_iter()
            .map(NodeRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nodes })
    }
}

impl NodeInventory for StaticInventory {
    fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        Ok(self.nodes.clone())
    }
}
