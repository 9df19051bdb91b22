//! File system helpers for the manifest builder and download verification.

pub mod digest;
pub mod walker;
