//! SINGLEBODY pass: resolve clusters that still hold a single region.
//!
//! Each iteration first looks for two linked singletons (subrule a) and only
//! when none exist tries to fold a singleton into the one multi-region
//! cluster it is linked to (subrule b). A singleton linked to zero or several
//! multi-region clusters stays unresolved for that iteration.

use tracing::{Span, field, info, instrument, trace};

use crate::{
    error::InvariantViolation,
    graph::{ClusterGraph, ClusterHandle},
};

use super::{MergeLedger, MergeRule, ScanOrder, Stage};

#[instrument(
    name = "core.stage.single_body",
    skip(graph, ledger),
    fields(merges = field::Empty),
)]
pub(super) fn run_single_body(
    graph: &mut ClusterGraph,
    ledger: &mut MergeLedger,
) -> Result<usize, InvariantViolation> {
    let mut merges = 0usize;
    loop {
        let order = ScanOrder::capture(graph)?;
        let (rule, target, source) =
            if let Some((target, source)) = find_singleton_pair(graph, &order)? {
                (MergeRule::SingletonPair, target, source)
            } else if let Some((target, source)) = find_attachment(graph, &order)? {
                (MergeRule::SingletonAttach, target, source)
            } else {
                break;
            };
        ledger.apply(graph, Stage::SingleBody, rule, target, source)?;
        merges += 1;
    }
    Span::current().record("merges", merges);
    info!(
        merges,
        clusters = graph.live_count(),
        "SINGLEBODY stage completed"
    );
    Ok(merges)
}

/// First pair of linked singletons in scan order; the earlier one survives.
fn find_singleton_pair(
    graph: &ClusterGraph,
    order: &ScanOrder,
) -> Result<Option<(ClusterHandle, ClusterHandle)>, InvariantViolation> {
    for (position, &handle) in order.handles.iter().enumerate() {
        let cluster = graph.cluster(handle)?;
        if !cluster.is_singleton() {
            continue;
        }
        let mut best: Option<(usize, ClusterHandle)> = None;
        for (neighbour, links) in cluster.links() {
            if links == 0 {
                continue;
            }
            let rank = order.rank_of(handle, neighbour)?;
            if rank <= position || !graph.cluster(neighbour)?.is_singleton() {
                continue;
            }
            if best.is_none_or(|(best_rank, _)| rank < best_rank) {
                best = Some((rank, neighbour));
            }
        }
        if let Some((_, partner)) = best {
            trace!(%handle, %partner, "singleton pair found");
            return Ok(Some((handle, partner)));
        }
    }
    Ok(None)
}

/// First singleton, in scan order, linked to exactly one multi-region
/// cluster. Returns `(multi_region_cluster, singleton)`.
fn find_attachment(
    graph: &ClusterGraph,
    order: &ScanOrder,
) -> Result<Option<(ClusterHandle, ClusterHandle)>, InvariantViolation> {
    for &handle in &order.handles {
        let cluster = graph.cluster(handle)?;
        if !cluster.is_singleton() {
            continue;
        }
        let mut candidates = Vec::new();
        for (neighbour, links) in cluster.links() {
            if links > 0 && graph.cluster(neighbour)?.len() > 1 {
                candidates.push(neighbour);
            }
        }
        match candidates.as_slice() {
            [only] => return Ok(Some((*only, handle))),
            [] => {}
            several => trace!(
                %handle,
                candidates = several.len(),
                "singleton linked to several bodies left unresolved"
            ),
        }
    }
    Ok(None)
}
