//! Shared test utilities used across guzman crates.

pub mod ci;
pub mod tracing;
