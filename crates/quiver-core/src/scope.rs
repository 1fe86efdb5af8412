//! Maven-compatible artifact scopes and the enclosure table that decides
//! which declared scopes appear on a classpath built for a target scope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dependency scope.
///
/// The numeric [`rank`](ArtifactScope::rank) is for display only. Classpath
/// membership is decided by [`encloses`](ArtifactScope::encloses), which is
/// an explicit table and does not follow the rank order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
}

impl ArtifactScope {
    /// All scopes in rank order.
    pub const ALL: [ArtifactScope; 5] = [
        ArtifactScope::Compile,
        ArtifactScope::Test,
        ArtifactScope::Runtime,
        ArtifactScope::Provided,
        ArtifactScope::System,
    ];

    pub fn rank(self) -> u8 {
        match self {
            ArtifactScope::Compile => 1,
            ArtifactScope::Test => 2,
            ArtifactScope::Runtime => 3,
            ArtifactScope::Provided => 4,
            ArtifactScope::System => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactScope::Compile => "compile",
            ArtifactScope::Test => "test",
            ArtifactScope::Runtime => "runtime",
            ArtifactScope::Provided => "provided",
            ArtifactScope::System => "system",
        }
    }

    /// Resolve an optional declared scope, falling back to `compile`.
    pub fn check(scope: Option<ArtifactScope>) -> ArtifactScope {
        scope.unwrap_or_default()
    }

    /// Scopes included on the classpath built for `self`.
    pub fn enclosed(self) -> &'static [ArtifactScope] {
        use ArtifactScope::*;
        match self {
            Compile => &[Compile, Provided, System],
            Test => &[Compile, Test, Provided, System],
            Runtime => &[Compile, Runtime, System],
            Provided => &[Compile, Test, Provided],
            System => &[System],
        }
    }

    /// Whether a classpath for `self` includes an item declared with `candidate`.
    ///
    /// An absent candidate is treated as `compile`.
    pub fn encloses(self, candidate: Option<ArtifactScope>) -> bool {
        self.enclosed().contains(&Self::check(candidate))
    }
}

impl fmt::Display for ArtifactScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown scope name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope `{0}`")]
pub struct UnknownScope(pub String);

impl FromStr for ArtifactScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compile" => Ok(ArtifactScope::Compile),
            "test" => Ok(ArtifactScope::Test),
            "runtime" => Ok(ArtifactScope::Runtime),
            "provided" => Ok(ArtifactScope::Provided),
            "system" => Ok(ArtifactScope::System),
            _ => Err(UnknownScope(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_scope_is_compile() {
        assert_eq!(ArtifactScope::check(None), ArtifactScope::Compile);
        assert!(ArtifactScope::Compile.encloses(None));
        assert!(!ArtifactScope::System.encloses(None));
    }

    #[test]
    fn ranks_are_display_order() {
        let ranks: Vec<u8> = ArtifactScope::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Runtime".parse::<ArtifactScope>(), Ok(ArtifactScope::Runtime));
        assert!("import".parse::<ArtifactScope>().is_err());
    }
}
