//! Structural invariant checks for the cluster graph.
//!
//! Run after every merge in debug builds and exposed through
//! [`ClusterGraph::check_invariants`] so property tests can assert graph
//! health between operations.

use tracing::{Level, trace};

use crate::error::InvariantViolation;

use super::ClusterGraph;

pub(super) fn check_all(graph: &ClusterGraph) -> Result<(), InvariantViolation> {
    if tracing::enabled!(Level::TRACE) {
        trace!(
            clusters = graph.live,
            regions = graph.index.len(),
            "checking cluster graph invariants"
        );
    }
    check_membership(graph)?;
    check_index(graph)?;
    check_links(graph)
}

/// Every live cluster is non-empty and each of its regions is indexed back
/// to it.
fn check_membership(graph: &ClusterGraph) -> Result<(), InvariantViolation> {
    for (handle, cluster) in graph.live_clusters() {
        if cluster.is_empty() {
            return Err(InvariantViolation::EmptyCluster { cluster: handle });
        }
        for &region in cluster.regions() {
            match graph.index.get(&region) {
                Some(&owner) if owner == handle => {}
                Some(&owner) => {
                    return Err(InvariantViolation::RegionInTwoClusters {
                        region,
                        first: owner,
                        second: handle,
                    });
                }
                None => {
                    return Err(InvariantViolation::UnindexedRegion {
                        region,
                        cluster: handle,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every index entry names a live cluster that holds the region.
fn check_index(graph: &ClusterGraph) -> Result<(), InvariantViolation> {
    for (&region, &handle) in &graph.index {
        let cluster = graph.cluster(handle)?;
        if !cluster.regions().contains(&region) {
            return Err(InvariantViolation::IndexMismatch {
                region,
                cluster: handle,
            });
        }
    }
    Ok(())
}

/// Edges are symmetric, never point at their own cluster and never point at
/// a discarded one.
fn check_links(graph: &ClusterGraph) -> Result<(), InvariantViolation> {
    for (origin, cluster) in graph.live_clusters() {
        for (target, forward) in cluster.links() {
            if target == origin {
                return Err(InvariantViolation::SelfLink { cluster: origin });
            }
            let neighbour = graph
                .cluster(target)
                .map_err(|_| InvariantViolation::DanglingEdge { origin, target })?;
            let backward = neighbour.link_count(origin);
            if backward != forward {
                return Err(InvariantViolation::AsymmetricLink {
                    origin,
                    target,
                    forward,
                    backward,
                });
            }
        }
    }
    Ok(())
}
