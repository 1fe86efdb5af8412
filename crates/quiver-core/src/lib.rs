//! Core data types for the quiver dependency graph engine.
//!
//! This crate defines the values that flow into and out of resolution:
//! artifact coordinates and metadata, ordered dependency declarations with
//! their exclusions, the scope lattice, and resolver configuration.
//!
//! Graph algorithms live in `quiver-resolver`; the only I/O here is
//! reading the configuration file.

pub mod artifact;
pub mod config;
pub mod declaration;
pub mod scope;
