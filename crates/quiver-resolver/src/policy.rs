//! Pairwise conflict resolution between competing edges into the same vertex.

use std::cmp::Ordering;

use quiver_core::config::{PolicyConfig, ResolverConfig};

use crate::graph::MetadataEdge;
use crate::version::{self, VersionOrdering};

/// Chooses one of two competing edges.
///
/// Implementations must be total and deterministic: `apply` always returns
/// one of its arguments, and the same pair in the same order always yields
/// the same winner. `first` is the edge seen earlier in traversal order.
pub trait ConflictResolutionPolicy {
    fn apply<'a>(&self, first: &'a MetadataEdge, second: &'a MetadataEdge) -> &'a MetadataEdge;
}

/// Nearest declaration wins; at equal depth the greater version wins.
///
/// Versions are compared lexicographically unless the policy was built with
/// [`VersionOrdering::Maven`]. Remaining ties go to the lower `pom_order`,
/// then to `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPolicy {
    pub closer_first: bool,
    pub newer_first: bool,
    pub version_ordering: VersionOrdering,
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self::from_policy_config(&PolicyConfig::default())
    }
}

impl DefaultPolicy {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::from_policy_config(&config.policy)
    }

    pub fn from_policy_config(config: &PolicyConfig) -> Self {
        Self {
            closer_first: config.closer_first,
            newer_first: config.newer_first,
            version_ordering: config.version_ordering,
        }
    }

    pub fn with_version_ordering(mut self, ordering: VersionOrdering) -> Self {
        self.version_ordering = ordering;
        self
    }

    /// Ordering of `a` relative to `b`, where `Greater` means `a` wins.
    fn rank(&self, a: &MetadataEdge, b: &MetadataEdge) -> Ordering {
        if a.depth != b.depth {
            let nearer = b.depth.cmp(&a.depth);
            return if self.closer_first { nearer } else { nearer.reverse() };
        }
        let by_version = version::compare(self.version_ordering, &a.version, &b.version);
        if by_version.is_ne() {
            return if self.newer_first {
                by_version
            } else {
                by_version.reverse()
            };
        }
        b.pom_order.cmp(&a.pom_order)
    }
}

impl ConflictResolutionPolicy for DefaultPolicy {
    fn apply<'a>(&self, first: &'a MetadataEdge, second: &'a MetadataEdge) -> &'a MetadataEdge {
        match self.rank(first, second) {
            Ordering::Less => second,
            Ordering::Equal | Ordering::Greater => first,
        }
    }
}
