//! Supported-version policy and upgrade advisories.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Version;

/// The only supported major version.
pub const SUPPORTED_MAJOR: u32 = 1;

/// Lowest minor version (of 1.x) accepted as a starting or target version.
pub const MIN_SUPPORTED_MINOR: u32 = 23;

/// Minor-version gaps larger than this produce a large-jump warning.
pub const LARGE_JUMP_THRESHOLD: u32 = 3;

/// Breaking changes tied to specific minor releases.
///
/// An advisory fires when an upgrade crosses its boundary, i.e.
/// `current.minor < boundary <= target.minor`.
const BOUNDARY_ADVISORIES: &[(u32, &str)] = &[
    (
        22,
        "Kubernetes 1.22: several deprecated beta APIs have been removed (Ingress, CRD, \
         admission webhook v1beta1). Migrate manifests to the stable APIs before upgrading",
    ),
    (
        24,
        "Kubernetes 1.24: dockershim has been removed. Nodes must run a CRI runtime such as \
         containerd",
    ),
    (
        25,
        "Kubernetes 1.25: PodSecurityPolicy has been removed. Migrate to Pod Security \
         Admission before upgrading",
    ),
];

/// Reason a version string is not acceptable under the policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Invalid version format: {0}")]
    Unparsable(String),

    #[error("Unsupported major version {found}: only Kubernetes {expected}.x is supported")]
    UnsupportedMajor { found: u32, expected: u32 },

    #[error("Version {version} is too old: minimum supported version is {major}.{min_minor}")]
    TooOld {
        version: Version,
        major: u32,
        min_minor: u32,
    },
}

/// Tunable policy constants.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    /// Lowest supported 1.x minor version (default: 23).
    #[serde(default = "default_min_supported_minor")]
    pub min_supported_minor: u32,

    /// Warn when an upgrade spans more minor versions than this (default: 3).
    #[serde(default = "default_large_jump_threshold")]
    pub large_jump_threshold: u32,
}

const fn default_min_supported_minor() -> u32 {
    MIN_SUPPORTED_MINOR
}
const fn default_large_jump_threshold() -> u32 {
    LARGE_JUMP_THRESHOLD
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_supported_minor: MIN_SUPPORTED_MINOR,
            large_jump_threshold: LARGE_JUMP_THRESHOLD,
        }
    }
}

impl PolicyConfig {
    /// Parse `version` and check it against the supported version family.
    pub fn validate(&self, version: &str) -> Result<Version, PolicyViolation> {
        let parsed = Version::parse(version)
            .map_err(|_| PolicyViolation::Unparsable(version.to_string()))?;

        if parsed.major != SUPPORTED_MAJOR {
            return Err(PolicyViolation::UnsupportedMajor {
                found: parsed.major,
                expected: SUPPORTED_MAJOR,
            });
        }

        if parsed.minor < self.min_supported_minor {
            return Err(PolicyViolation::TooOld {
                version: parsed,
                major: SUPPORTED_MAJOR,
                min_minor: self.min_supported_minor,
            });
        }

        Ok(parsed)
    }

    /// Advisories for an upgrade from `current` to `target`.
    ///
    /// Empty across major versions, since no path exists to advise on.
    pub fn upgrade_warnings(&self, current: &Version, target: &Version) -> Vec<String> {
        let mut warnings = Vec::new();
        if current.major != target.major {
            return warnings;
        }

        let gap = current.minor_gap(target);
        if gap > self.large_jump_threshold {
            warnings.push(format!(
                "Upgrading across {gap} minor versions; every intermediate release will be \
                 applied in sequence. Review release notes for each version"
            ));
        }

        warnings.extend(
            BOUNDARY_ADVISORIES
                .iter()
                .filter(|(boundary, _)| current.minor < *boundary && *boundary <= target.minor)
                .map(|(_, advisory)| (*advisory).to_string()),
        );

        warnings
    }
}

/// Validate a version string against the default policy.
pub fn validate_version_string(version: &str) -> Result<Version, PolicyViolation> {
    PolicyConfig::default().validate(version)
}

/// Upgrade advisories under the default policy.
pub fn get_upgrade_warnings(current: &Version, target: &Version) -> Vec<String> {
    PolicyConfig::default().upgrade_warnings(current, target)
}
