//! GLOBAL pass: merge clusters that share at least `threshold` links.

use std::num::NonZeroU32;

use tracing::{Span, field, info, instrument, trace};

use crate::{
    error::InvariantViolation,
    graph::{ClusterGraph, ClusterHandle},
};

use super::{MergeLedger, MergeRule, ScanOrder, Stage};

#[instrument(
    name = "core.stage.global",
    skip(graph, ledger),
    fields(threshold = threshold.get(), merges = field::Empty),
)]
pub(super) fn run_global(
    graph: &mut ClusterGraph,
    threshold: NonZeroU32,
    ledger: &mut MergeLedger,
) -> Result<usize, InvariantViolation> {
    let mut merges = 0usize;
    while let Some((target, source, links)) = find_pair(graph, threshold.get())? {
        ledger.apply(
            graph,
            Stage::Global,
            MergeRule::LinkThreshold { links },
            target,
            source,
        )?;
        merges += 1;
    }
    Span::current().record("merges", merges);
    info!(merges, clusters = graph.live_count(), "GLOBAL stage completed");
    Ok(merges)
}

/// Finds the first qualifying pair in scan order.
///
/// Pairs are ranked lexicographically by the scan positions of their two
/// clusters; the earlier cluster becomes the merge target. Only adjacent
/// clusters can reach a positive threshold, so each cluster's edge map stands
/// in for the full pairwise sweep.
fn find_pair(
    graph: &ClusterGraph,
    threshold: u32,
) -> Result<Option<(ClusterHandle, ClusterHandle, u32)>, InvariantViolation> {
    let order = ScanOrder::capture(graph)?;
    for (position, &handle) in order.handles.iter().enumerate() {
        let cluster = graph.cluster(handle)?;
        let mut best: Option<(usize, ClusterHandle, u32)> = None;
        for (neighbour, links) in cluster.links() {
            if links < threshold {
                continue;
            }
            let rank = order.rank_of(handle, neighbour)?;
            if rank <= position {
                continue;
            }
            if best.is_none_or(|(best_rank, _, _)| rank < best_rank) {
                best = Some((rank, neighbour, links));
            }
        }
        if let Some((_, partner, links)) = best {
            trace!(%handle, %partner, links, "GLOBAL pair found");
            return Ok(Some((handle, partner, links)));
        }
    }
    Ok(None)
}
