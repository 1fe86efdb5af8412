//! Dependency graph conflict resolution: a pair-keyed multigraph of
//! artifact metadata, a nearest-wins conflict policy, scope-aware
//! resolution with exclusions, and classpath assembly.

pub mod builder;
pub mod cache;
pub mod classpath;
pub mod conflict;
pub mod graph;
pub mod policy;
pub mod resolver;
pub mod version;
