//! Benchmark parameter types.

use std::fmt;

/// Parameters identifying one scene-size benchmark input.
#[derive(Clone, Debug)]
pub struct SceneBenchParams {
    /// Number of bodies in the generated scene.
    pub bodies: usize,
    /// Regions per body.
    pub regions_per_body: usize,
}

impl fmt::Display for SceneBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bodies={},regions={}", self.bodies, self.regions_per_body)
    }
}
