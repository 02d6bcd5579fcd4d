//! Benchmark support crate for guzman.
//!
//! Generates synthetic scenes whose regions fall into known bodies so the
//! Criterion benchmarks can time graph construction, the merge passes and
//! the full grouping pipeline on inputs of controlled size.

pub mod error;
pub mod params;
pub mod scene;
