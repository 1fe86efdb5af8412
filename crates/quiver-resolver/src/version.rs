//! Version string comparison used to break ties between equally near edges.
//!
//! The default ordering is plain byte-wise string comparison, so `"1.10"`
//! sorts *before* `"1.9"`. Maven's segment-aware ordering is opt-in through
//! [`VersionOrdering::Maven`].
//!
//! Maven ordering splits versions on `.` and `-`, compares numeric segments
//! as numbers, and ranks the well-known qualifiers
//! `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`.

use std::cmp::Ordering;

pub use quiver_core::config::VersionOrdering;

/// Compare two requested versions under `ordering`.
pub fn compare(ordering: VersionOrdering, a: &str, b: &str) -> Ordering {
    match ordering {
        VersionOrdering::Lexicographic => a.as_bytes().cmp(b.as_bytes()),
        VersionOrdering::Maven => MavenVersion::parse(a).cmp(&MavenVersion::parse(b)),
    }
}

/// A parsed Maven version with comparable segments.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let segments = version
            .split(['.', '-'])
            .filter(|t| !t.is_empty())
            .map(Segment::classify)
            .collect();
        Self { segments }
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| match (self.segments.get(i), other.segments.get(i)) {
                (None, None) => Ordering::Equal,
                (Some(s), None) => s.cmp_to_missing(),
                (None, Some(s)) => s.cmp_to_missing().reverse(),
                (Some(a), Some(b)) => a.cmp_segment(b),
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Segment {
    fn classify(token: &str) -> Segment {
        if let Ok(n) = token.parse::<u64>() {
            return Segment::Numeric(n);
        }
        match token.to_lowercase().as_str() {
            "alpha" | "a" => Segment::Qualifier(QualifierKind::Alpha),
            "beta" | "b" => Segment::Qualifier(QualifierKind::Beta),
            "milestone" | "m" => Segment::Qualifier(QualifierKind::Milestone),
            "rc" | "cr" => Segment::Qualifier(QualifierKind::Rc),
            "snapshot" => Segment::Qualifier(QualifierKind::Snapshot),
            "ga" | "final" | "release" => Segment::Qualifier(QualifierKind::Release),
            "sp" => Segment::Qualifier(QualifierKind::Sp),
            _ => Segment::Text(token.to_string()),
        }
    }

    /// How this segment compares against a shorter version's implicit padding.
    fn cmp_to_missing(&self) -> Ordering {
        match self {
            Segment::Numeric(n) => n.cmp(&0),
            Segment::Qualifier(q) => q.cmp(&QualifierKind::Release),
            Segment::Text(_) => Ordering::Less,
        }
    }

    fn cmp_segment(&self, other: &Segment) -> Ordering {
        use Segment::*;
        match (self, other) {
            (Numeric(a), Numeric(b)) => a.cmp(b),
            (Qualifier(a), Qualifier(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Numeric(_), _) => Ordering::Greater,
            (_, Numeric(_)) => Ordering::Less,
            (Qualifier(q), Text(_)) if *q >= QualifierKind::Release => Ordering::Greater,
            (Qualifier(_), Text(_)) => Ordering::Less,
            (Text(_), Qualifier(q)) if *q >= QualifierKind::Release => Ordering::Less,
            (Text(_), Qualifier(_)) => Ordering::Greater,
        }
    }
}
