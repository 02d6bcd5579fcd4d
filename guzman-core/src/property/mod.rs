//! Property-based tests for the grouping pipeline.
//!
//! Generated link lists exercise the partition, symmetry, monotonic-shrink,
//! fixpoint and determinism properties across several graph topologies.

mod checks;
mod strategies;
#[cfg(test)]
mod tests;
mod types;
