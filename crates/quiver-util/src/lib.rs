//! Shared utilities for the quiver dependency graph engine.
//!
//! This crate provides the cross-cutting error taxonomy used by every other
//! quiver crate.

pub mod errors;
