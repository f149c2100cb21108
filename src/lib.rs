//! Workspace root crate.
//!
//! This package exists only to host workspace-level dev-tooling
//! (`cargo-husky`'s git hooks); the actual codec lives in the
//! `mavcodec-schema`, `mavcodec-wire`, and `mavcodec-harness` crates
//! under `crates/`.
