//! Arena-backed cluster graph used by the grouping stages.
//!
//! Clusters ("nuclei") live in a flat arena and refer to one another through
//! stable [`ClusterHandle`] indices, never through references. Each cluster
//! keeps an ordered map from neighbouring handles to link counts, and a
//! separate region index records which live cluster owns each region. The
//! index is the single source of truth for liveness: a merged-away slot is
//! emptied and nothing may point at it afterwards.
//!
//! Ordered maps are used throughout so that every scan over the graph visits
//! clusters and edges in the same order for the same input.

mod invariants;
mod merge;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use tracing::{debug, instrument, trace};

use crate::{
    error::InvariantViolation,
    region::{RegionId, RegionLink},
};

pub use self::merge::MergeOutcome;

/// Stable arena index addressing a cluster for the lifetime of one run.
///
/// # Examples
/// ```
/// use guzman_core::{ClusterGraph, RegionId, RegionLink};
///
/// let links = [RegionLink::new(1, 2, "A")];
/// let graph = ClusterGraph::from_links(&links, RegionId::new(99));
/// let handle = graph.cluster_of(RegionId::new(2)).expect("region 2 is indexed");
/// assert_eq!(handle.index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterHandle(usize);

impl ClusterHandle {
    /// Wraps an arena slot. Handles that never came from a graph are
    /// rejected by every graph operation that receives them.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena slot addressed by this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A growing set of regions believed to form one body, plus its link counts
/// to the other live clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    regions: BTreeSet<RegionId>,
    links: BTreeMap<ClusterHandle, u32>,
}

impl Cluster {
    fn singleton(region: RegionId) -> Self {
        Self {
            regions: BTreeSet::from([region]),
            links: BTreeMap::new(),
        }
    }

    /// Returns the regions owned by the cluster in ascending order.
    #[must_use]
    pub fn regions(&self) -> &BTreeSet<RegionId> {
        &self.regions
    }

    /// Returns the number of regions owned by the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Reports whether the cluster owns no regions. Live clusters never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Reports whether the cluster owns exactly one region.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.regions.len() == 1
    }

    /// Returns the smallest region id, used to order clusters during scans.
    #[must_use]
    pub fn smallest_region(&self) -> Option<RegionId> {
        self.regions.first().copied()
    }

    /// Returns the link count recorded towards `other`, zero when absent.
    #[must_use]
    pub fn link_count(&self, other: ClusterHandle) -> u32 {
        self.links.get(&other).copied().unwrap_or(0)
    }

    /// Iterates the recorded edges in ascending handle order.
    pub fn links(&self) -> impl Iterator<Item = (ClusterHandle, u32)> + '_ {
        self.links.iter().map(|(&handle, &count)| (handle, count))
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nucleus(regions=[")?;
        for (position, region) in self.regions.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{region}")?;
        }
        f.write_str("])")
    }
}

/// Owns every cluster of one grouping run together with the region index.
///
/// # Examples
/// ```
/// use guzman_core::{ClusterGraph, RegionId, RegionLink};
///
/// let links = [
///     RegionLink::new(1, 2, "A"),
///     RegionLink::new(1, 2, "B"),
///     RegionLink::new(2, 99, "C"),
/// ];
/// let graph = ClusterGraph::from_links(&links, RegionId::new(99));
/// assert_eq!(graph.live_count(), 2);
/// assert_eq!(graph.region_count(), 2);
/// let one = graph.cluster_of(RegionId::new(1)).expect("indexed");
/// let two = graph.cluster_of(RegionId::new(2)).expect("indexed");
/// assert_eq!(graph.link_count(one, two), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterGraph {
    clusters: Vec<Option<Cluster>>,
    index: BTreeMap<RegionId, ClusterHandle>,
    live: usize,
}

impl ClusterGraph {
    /// Builds the initial graph of singleton clusters from `links`.
    ///
    /// One cluster is created per distinct region other than `background`.
    /// Each link between two distinct non-background clusters adds one to
    /// their shared count; links touching the background and self-loops add
    /// nothing.
    #[instrument(
        name = "core.build_graph",
        skip(links),
        fields(links = links.len(), background = %background),
    )]
    #[must_use]
    pub fn from_links(links: &[RegionLink], background: RegionId) -> Self {
        let mut graph = Self::default();
        let mut edges = 0usize;
        for link in links {
            let (first, second) = link.regions();
            let first_handle = graph.ensure_cluster(first, background);
            let second_handle = graph.ensure_cluster(second, background);
            let (Some(left), Some(right)) = (first_handle, second_handle) else {
                trace!(link = %link, "dropping link touching the background");
                continue;
            };
            if left == right {
                trace!(link = %link, "dropping self-loop link");
                continue;
            }
            trace!(link = %link, "recording link");
            graph.increment_link(left, right);
            edges += 1;
        }
        debug!(
            clusters = graph.live,
            counted_links = edges,
            "built initial cluster graph"
        );
        graph
    }

    fn ensure_cluster(&mut self, region: RegionId, background: RegionId) -> Option<ClusterHandle> {
        if region == background {
            return None;
        }
        if let Some(&handle) = self.index.get(&region) {
            return Some(handle);
        }
        let handle = ClusterHandle(self.clusters.len());
        self.clusters.push(Some(Cluster::singleton(region)));
        self.index.insert(region, handle);
        self.live += 1;
        Some(handle)
    }

    fn increment_link(&mut self, left: ClusterHandle, right: ClusterHandle) {
        for (from, to) in [(left, right), (right, left)] {
            if let Some(Some(cluster)) = self.clusters.get_mut(from.0) {
                let count = cluster.links.entry(to).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
    }

    /// Returns the number of live clusters.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Returns the number of indexed (non-background) regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the live cluster owning `region`, if the region is indexed.
    #[must_use]
    pub fn cluster_of(&self, region: RegionId) -> Option<ClusterHandle> {
        self.index.get(&region).copied()
    }

    /// Returns the cluster addressed by `handle`.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::DiscardedCluster`] when `handle` no
    /// longer refers to a live cluster.
    pub fn cluster(&self, handle: ClusterHandle) -> Result<&Cluster, InvariantViolation> {
        self.clusters
            .get(handle.0)
            .and_then(Option::as_ref)
            .ok_or(InvariantViolation::DiscardedCluster { cluster: handle })
    }

    fn cluster_mut(&mut self, handle: ClusterHandle) -> Result<&mut Cluster, InvariantViolation> {
        self.clusters
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(InvariantViolation::DiscardedCluster { cluster: handle })
    }

    /// Returns the link count between two clusters, zero when either is not
    /// live or they are not adjacent.
    #[must_use]
    pub fn link_count(&self, left: ClusterHandle, right: ClusterHandle) -> u32 {
        self.cluster(left)
            .map(|cluster| cluster.link_count(right))
            .unwrap_or(0)
    }

    /// Iterates the live clusters in arena order.
    pub fn live_clusters(&self) -> impl Iterator<Item = (ClusterHandle, &Cluster)> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter_map(|(slot, cluster)| cluster.as_ref().map(|c| (ClusterHandle(slot), c)))
    }

    /// Iterates the region index in ascending region order.
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, ClusterHandle)> + '_ {
        self.index.iter().map(|(&region, &handle)| (region, handle))
    }

    /// Returns the live handles ordered by each cluster's smallest region.
    ///
    /// This is the scan order every grouping stage uses, which keeps merge
    /// choices reproducible for a given input.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::EmptyCluster`] if a live cluster holds no
    /// regions.
    pub fn scan_order(&self) -> Result<Vec<ClusterHandle>, InvariantViolation> {
        let mut keyed = Vec::with_capacity(self.live);
        for (handle, cluster) in self.live_clusters() {
            let smallest = cluster
                .smallest_region()
                .ok_or(InvariantViolation::EmptyCluster { cluster: handle })?;
            keyed.push((smallest, handle));
        }
        keyed.sort_unstable();
        Ok(keyed.into_iter().map(|(_, handle)| handle).collect())
    }

    /// Runs every structural check over the graph.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        invariants::check_all(self)
    }
}
