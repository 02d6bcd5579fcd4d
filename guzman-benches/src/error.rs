//! Benchmark setup error type.

use guzman_core::GroupingError;

use crate::scene::SceneError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic scene generation failed.
    #[error("synthetic scene generation failed: {0}")]
    Scene(#[from] SceneError),
    /// The engine rejected the configuration or the generated scene.
    #[error("grouping failed: {0}")]
    Grouping(#[from] GroupingError),
}
