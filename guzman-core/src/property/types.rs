//! Type definitions for grouping property tests.

use test_strategy::Arbitrary;

use crate::region::{RegionId, RegionLink};

/// Shape of the generated link graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum LinkTopology {
    /// Links between uniformly random region pairs.
    Scattered,
    /// A path with occasional doubled links.
    Chain,
    /// Small groups of regions that are densely linked internally.
    Clustered,
    /// One hub region linked to every other region.
    Star,
}

/// Generated input for one property case.
#[derive(Clone, Debug)]
pub(super) struct LinkFixture {
    /// Links handed to the engine.
    pub links: Vec<RegionLink>,
    /// Background region excluded from grouping.
    pub background: RegionId,
    /// Topology used during generation.
    pub topology: LinkTopology,
}
