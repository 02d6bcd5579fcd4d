//! Result types for grouping runs.
//!
//! A [`GroupingResult`] holds the extracted bodies, ordered by their smallest
//! region, together with the merge log of the run.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    error::InvariantViolation,
    graph::{ClusterGraph, ClusterHandle},
    region::RegionId,
    stages::MergeEvent,
};

/// One inferred 3-D body: a maximal set of regions grouped together.
///
/// # Examples
/// ```
/// use guzman_core::{RegionId, RegionLink, group_regions};
///
/// let links = [RegionLink::new(3, 4, "A"), RegionLink::new(3, 4, "B")];
/// let result = group_regions(&links, Some(RegionId::new(0)))?;
/// let body = &result.bodies()[0];
/// assert_eq!(body.len(), 2);
/// assert_eq!(body.smallest_region(), RegionId::new(3));
/// assert_eq!(body.to_string(), "[3, 4]");
/// # Ok::<(), guzman_core::GroupingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    smallest: RegionId,
    regions: BTreeSet<RegionId>,
}

impl Body {
    /// Returns the regions of the body in ascending order.
    #[must_use]
    pub fn regions(&self) -> &BTreeSet<RegionId> {
        &self.regions
    }

    /// Returns the smallest region id of the body.
    #[must_use]
    pub const fn smallest_region(&self) -> RegionId {
        self.smallest
    }

    /// Returns the number of regions in the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always `false`: bodies hold at least one region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Reports whether `region` belongs to the body.
    #[must_use]
    pub fn contains(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, region) in self.regions.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{region}")?;
        }
        f.write_str("]")
    }
}

/// Represents the output of a [`crate::Grouper::group`] invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingResult {
    bodies: Vec<Body>,
    merges: Vec<MergeEvent>,
}

impl GroupingResult {
    pub(crate) fn new(bodies: Vec<Body>, merges: Vec<MergeEvent>) -> Self {
        Self { bodies, merges }
    }

    /// Returns the bodies ordered by their smallest region.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Consumes the result and returns the bodies.
    #[must_use]
    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    /// Returns how many bodies were found.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of grouped regions across all bodies.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.bodies.iter().map(Body::len).sum()
    }

    /// Returns the position in [`Self::bodies`] of the body holding `region`.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::{RegionId, RegionLink, group_regions};
    ///
    /// let links = [RegionLink::new(1, 2, "A"), RegionLink::new(1, 99, "B")];
    /// let result = group_regions(&links, Some(RegionId::new(99)))?;
    /// assert_eq!(result.body_of(RegionId::new(2)), Some(0));
    /// assert_eq!(result.body_of(RegionId::new(99)), None);
    /// # Ok::<(), guzman_core::GroupingError>(())
    /// ```
    #[must_use]
    pub fn body_of(&self, region: RegionId) -> Option<usize> {
        self.bodies.iter().position(|body| body.contains(region))
    }

    /// Returns the merges performed, in application order.
    #[must_use]
    pub fn merges(&self) -> &[MergeEvent] {
        &self.merges
    }
}

/// Collects the live clusters of `graph` as bodies ordered by smallest region.
///
/// The partition is re-checked on the way out: every indexed region must land
/// in exactly one body.
pub(crate) fn extract_bodies(graph: &ClusterGraph) -> Result<Vec<Body>, InvariantViolation> {
    let mut owners: BTreeMap<RegionId, ClusterHandle> = BTreeMap::new();
    let mut bodies = Vec::with_capacity(graph.live_count());
    for (handle, cluster) in graph.live_clusters() {
        let smallest = cluster
            .smallest_region()
            .ok_or(InvariantViolation::EmptyCluster { cluster: handle })?;
        for &region in cluster.regions() {
            if let Some(first) = owners.insert(region, handle) {
                return Err(InvariantViolation::RegionInTwoClusters {
                    region,
                    first,
                    second: handle,
                });
            }
        }
        bodies.push(Body {
            smallest,
            regions: cluster.regions().clone(),
        });
    }
    for (region, handle) in graph.regions() {
        if !owners.contains_key(&region) {
            return Err(InvariantViolation::IndexMismatch {
                region,
                cluster: handle,
            });
        }
    }
    bodies.sort_by_key(Body::smallest_region);
    Ok(bodies)
}
