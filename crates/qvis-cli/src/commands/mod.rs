//! CLI command implementations.

pub mod common;
pub mod examples;
pub mod simulate;
pub mod version;
