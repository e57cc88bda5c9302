//! Upgrade path calculation under the one-minor-version-at-a-time rule.

use std::fmt;
use std::iter;
use std::ops::Deref;

use serde::Serialize;
use tracing::debug;

use super::Version;
use crate::error::KrollError;

/// Ordered hops from the current version to the target, excluding the
/// current version itself. Empty means there is nothing to do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpgradePath(Vec<Version>);

impl UpgradePath {
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Final version of the path, if any.
    pub fn target(&self) -> Option<&Version> {
        self.0.last()
    }

    /// Steps rendered as strings, the shape stored in resource status.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Deref for UpgradePath {
    type Target = [Version];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a UpgradePath {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for UpgradePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(
                f,
                "No upgrade needed: already at or above the target version"
            ),
            [target] => write!(f, "Direct upgrade to {target}"),
            steps => {
                let hops: Vec<String> = steps.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "Multi-step upgrade required: {} steps ({})",
                    steps.len(),
                    hops.join(" -> ")
                )
            }
        }
    }
}

/// Calculate the upgrade path from `current` to `target`.
///
/// Returns an empty path when `target <= current` (no-op or downgrade).
/// Patch bumps and adjacent minor bumps are a single direct hop; larger
/// gaps go through every intermediate minor at patch 0 and end at the
/// exact target. Upgrades across major versions are rejected.
pub fn calculate_upgrade_path(
    current: &Version,
    target: &Version,
) -> Result<UpgradePath, KrollError> {
    if target <= current {
        debug!(
            "Target {} is not ahead of current {}, nothing to upgrade",
            target, current
        );
        return Ok(UpgradePath::empty());
    }

    if target.major != current.major {
        return Err(KrollError::UpgradeNotPossible(format!(
            "Cross-major version upgrades are not supported ({current} -> {target})"
        )));
    }

    let first = current.next_minor();
    let mut path: Vec<Version> = iter::successors(Some(first), |step| Some(step.next_minor()))
        .take_while(|step| step.minor < target.minor)
        .collect();
    path.push(*target);

    debug!(
        "Upgrade path {} -> {}: {} step(s)",
        current,
        target,
        path.len()
    );

    Ok(UpgradePath(path))
}

/// True when `a` and `b` share major and minor but differ in patch.
pub fn is_patch_upgrade(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor && a.patch != b.patch
}

/// Human-readable summary of an upgrade path.
pub fn format_upgrade_path_message(path: &UpgradePath) -> String {
    path.to_string()
}
