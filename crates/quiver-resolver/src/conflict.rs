//! Record of the version conflicts settled during resolution.

use std::fmt;

use crate::graph::MetadataEdge;

/// All version conflicts encountered during resolution, in decision order.
#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single conflict where an artifact was requested at a version that lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub group: String,
    pub artifact: String,
    pub requested: String,
    pub resolved: String,
    pub reason: String,
}

impl VersionConflict {
    pub(crate) fn between(
        group: &str,
        artifact: &str,
        winner: &MetadataEdge,
        loser: &MetadataEdge,
    ) -> Self {
        let reason = if winner.depth != loser.depth {
            format!("depth {} vs {}", winner.depth, loser.depth)
        } else if winner.version != loser.version {
            format!("version {} vs {} at depth {}", winner.version, loser.version, winner.depth)
        } else {
            format!("declaration order {} vs {}", winner.pom_order, loser.pom_order)
        };
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            requested: loser.version.clone(),
            resolved: winner.version.clone(),
            reason,
        }
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Conflicts recorded for one `group:artifact`.
    pub fn for_artifact<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a VersionConflict> {
        self.conflicts.iter().filter(move |c| c.key() == key)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} requested {} but resolved {} ({})",
            self.group, self.artifact, self.requested, self.resolved, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn reason_names_the_deciding_rule() {
        let near = MetadataEdge::new("1.0", 1, 1);
        let far = MetadataEdge::new("2.0", 2, 1);
        let c = VersionConflict::between("org.example", "lib", &near, &far);
        assert_eq!(c.reason, "depth 1 vs 2");

        let newer = MetadataEdge::new("1.2", 2, 1);
        let older = MetadataEdge::new("1.1", 2, 1);
        let c = VersionConflict::between("org.example", "lib", &newer, &older);
        assert_eq!(c.reason, "version 1.2 vs 1.1 at depth 2");
    }

    #[test]
    fn report_with_conflicts() {
        let mut report = ConflictReport::new();
        report.add(VersionConflict::between(
            "org.example",
            "lib",
            &MetadataEdge::new("1.0", 1, 1),
            &MetadataEdge::new("2.0", 2, 1),
        ));
        assert_eq!(report.len(), 1);
        assert_eq!(report.for_artifact("org.example:lib").count(), 1);
        assert_eq!(report.for_artifact("org.example:other").count(), 0);
        let s = report.to_string();
        assert!(s.contains("org.example:lib requested 2.0 but resolved 1.0 (depth 1 vs 2)"));
    }
}
