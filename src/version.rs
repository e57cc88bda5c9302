//! Kubernetes version parsing, comparison and upgrade policy.

pub mod path;
pub mod policy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KrollError;

/// A Kubernetes release version (`major.minor.patch`).
///
/// Ordering is lexicographic on `(major, minor, patch)`, which the derived
/// `Ord` provides through field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string such as `1.27.4`, `v1.28.0` or `1.27`.
    ///
    /// Accepts an optional leading `v` and one to three dot-separated
    /// numeric components. Missing components default to 0.
    pub fn parse(version: &str) -> Result<Self, KrollError> {
        let invalid = || KrollError::InvalidVersion(version.to_string());

        let trimmed = version.strip_prefix('v').unwrap_or(version);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            // u32::from_str accepts a leading '+', so check digits first
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        let [major, minor, patch] = components;
        Ok(Self::new(major, minor, patch))
    }

    /// The first release of the next minor version (`1.27.4` -> `1.28.0`).
    pub const fn next_minor(&self) -> Self {
        Self::new(self.major, self.minor.saturating_add(1), 0)
    }

    /// Number of minor versions between `self` and a later `other`.
    /// Returns 0 when `other` is not ahead or lives on another major.
    pub const fn minor_gap(&self, other: &Self) -> u32 {
        if self.major != other.major {
            return 0;
        }
        other.minor.saturating_sub(self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = KrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
