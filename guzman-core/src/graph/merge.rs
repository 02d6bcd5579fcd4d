//! The merge primitive: the only operation that mutates a built graph.

use tracing::debug;

use crate::{error::InvariantViolation, region::RegionId};

use super::{ClusterGraph, ClusterHandle};

/// Describes one completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Cluster that absorbed the other and stays live.
    pub target: ClusterHandle,
    /// Cluster that was absorbed and discarded.
    pub absorbed: ClusterHandle,
    /// Regions of `target` before the merge, ascending.
    pub target_regions: Vec<RegionId>,
    /// Regions taken over from `absorbed`, ascending.
    pub absorbed_regions: Vec<RegionId>,
    /// Link count that joined the two clusters and was dropped by the merge.
    pub joining_links: u32,
}

impl ClusterGraph {
    /// Absorbs `source` into `target` in place.
    ///
    /// `target` takes over every region of `source`. Edges from `source` to
    /// third clusters are moved onto `target`, summed with any edge `target`
    /// already had to the same cluster, and mirrored on that cluster. The
    /// edge between `source` and `target` is dropped. The region index is
    /// repointed before the call returns and `source` is discarded.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::SelfMerge`] when both handles are equal,
    /// [`InvariantViolation::DiscardedCluster`] when either cluster is not
    /// live and [`InvariantViolation::DanglingEdge`] when `source` points at
    /// a discarded cluster. Debug builds also reject overlapping region sets
    /// and re-check every graph invariant after the merge.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::{ClusterGraph, RegionId, RegionLink};
    ///
    /// let links = [
    ///     RegionLink::new(1, 2, "A"),
    ///     RegionLink::new(1, 3, "B"),
    ///     RegionLink::new(2, 3, "C"),
    /// ];
    /// let mut graph = ClusterGraph::from_links(&links, RegionId::new(0));
    /// let one = graph.cluster_of(RegionId::new(1)).expect("indexed");
    /// let two = graph.cluster_of(RegionId::new(2)).expect("indexed");
    /// let three = graph.cluster_of(RegionId::new(3)).expect("indexed");
    ///
    /// let outcome = graph.merge(one, two)?;
    /// assert_eq!(outcome.joining_links, 1);
    /// assert_eq!(graph.live_count(), 2);
    /// assert_eq!(graph.cluster_of(RegionId::new(2)), Some(one));
    /// assert_eq!(graph.link_count(one, three), 2);
    /// assert_eq!(graph.link_count(three, one), 2);
    /// # Ok::<(), guzman_core::InvariantViolation>(())
    /// ```
    pub fn merge(
        &mut self,
        target: ClusterHandle,
        source: ClusterHandle,
    ) -> Result<MergeOutcome, InvariantViolation> {
        if target == source {
            return Err(InvariantViolation::SelfMerge { cluster: target });
        }
        let target_regions: Vec<RegionId> = self.cluster(target)?.regions.iter().copied().collect();
        self.cluster(source)?;

        if cfg!(debug_assertions) {
            self.reject_overlap(target, source)?;
        }
        for (neighbour, _) in self.cluster(source)?.links() {
            if neighbour != target && self.cluster(neighbour).is_err() {
                return Err(InvariantViolation::DanglingEdge {
                    origin: source,
                    target: neighbour,
                });
            }
        }

        let absorbed = self
            .clusters
            .get_mut(source.0)
            .and_then(Option::take)
            .ok_or(InvariantViolation::DiscardedCluster { cluster: source })?;
        self.live = self.live.saturating_sub(1);

        let joining_links = absorbed.link_count(target);
        self.cluster_mut(target)?.links.remove(&source);

        for (&neighbour, &count) in &absorbed.links {
            if neighbour == target {
                continue;
            }
            let third = self.cluster_mut(neighbour)?;
            third.links.remove(&source);
            let combined = third.links.entry(target).or_insert(0);
            *combined = combined.saturating_add(count);
            let total = *combined;
            self.cluster_mut(target)?.links.insert(neighbour, total);
        }

        for &region in &absorbed.regions {
            self.index.insert(region, target);
        }
        let absorbed_regions: Vec<RegionId> = absorbed.regions.iter().copied().collect();
        self.cluster_mut(target)?.regions.extend(absorbed.regions);

        debug!(
            absorbed = ?absorbed_regions,
            into = ?target_regions,
            joining_links,
            live = self.live,
            "merged regions"
        );

        if cfg!(debug_assertions) {
            self.check_invariants()?;
        }

        Ok(MergeOutcome {
            target,
            absorbed: source,
            target_regions,
            absorbed_regions,
            joining_links,
        })
    }

    fn reject_overlap(
        &self,
        target: ClusterHandle,
        source: ClusterHandle,
    ) -> Result<(), InvariantViolation> {
        let kept = self.cluster(target)?;
        let incoming = self.cluster(source)?;
        match incoming
            .regions
            .iter()
            .find(|region| kept.regions.contains(region))
        {
            Some(&region) => Err(InvariantViolation::RegionInTwoClusters {
                region,
                first: target,
                second: source,
            }),
            None => Ok(()),
        }
    }
}
