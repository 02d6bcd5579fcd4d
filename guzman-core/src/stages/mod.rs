//! Heuristic merge stages that drive the cluster graph to a fixpoint.
//!
//! Two passes run in strict order within a round:
//!
//! - **GLOBAL** merges any two clusters joined by at least the configured
//!   number of links (two by default).
//! - **SINGLEBODY** pairs linked singleton clusters and folds a singleton into
//!   the only multi-region cluster it is linked to.
//!
//! Each pass restarts its scan after every merge, because a merge rewrites
//! the counts between the merged cluster and its neighbours and may unlock a
//! pair the previous scan already passed. Every merge removes one live
//! cluster, so a run never performs more than `initial clusters - 1` merges;
//! the runner enforces that bound as a budget.

mod global;
mod single_body;

use std::{collections::BTreeMap, fmt, num::NonZeroU32};

use tracing::{debug, instrument};

use crate::{
    error::InvariantViolation,
    graph::{ClusterGraph, ClusterHandle},
    region::RegionId,
};

const DEFAULT_LINK_THRESHOLD: NonZeroU32 = match NonZeroU32::new(2) {
    Some(threshold) => threshold,
    None => NonZeroU32::MIN,
};

/// Names the heuristic pass that performed a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Merge clusters joined by at least the link threshold.
    Global,
    /// Resolve leftover singleton clusters.
    SingleBody,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Global => "GLOBAL",
            Self::SingleBody => "SINGLEBODY",
        })
    }
}

/// The rule within a stage that justified a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeRule {
    /// Two clusters shared at least the threshold number of links.
    LinkThreshold {
        /// Link count observed between the clusters.
        links: u32,
    },
    /// Two singleton clusters shared a positive link count.
    SingletonPair,
    /// A singleton was linked to exactly one multi-region cluster.
    SingletonAttach,
}

/// One entry of the merge log returned by [`StageRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEvent {
    /// Pass that performed the merge.
    pub stage: Stage,
    /// Rule that selected the pair.
    pub rule: MergeRule,
    /// Regions of the surviving cluster before the merge.
    pub target: Vec<RegionId>,
    /// Regions of the absorbed cluster.
    pub absorbed: Vec<RegionId>,
}

/// Controls whether the GLOBAL→SINGLEBODY round repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundPolicy {
    /// Run GLOBAL then SINGLEBODY once each.
    Single,
    /// Repeat the round until a whole round performs no merge, leaving a
    /// cluster set on which neither pass finds anything to do.
    #[default]
    UntilStable,
}

/// Applies the GLOBAL and SINGLEBODY passes to a [`ClusterGraph`].
///
/// # Examples
/// ```
/// use guzman_core::{ClusterGraph, RegionId, RegionLink, Stage, StageRunner};
///
/// let links = [RegionLink::new(1, 2, "A"), RegionLink::new(1, 2, "B")];
/// let mut graph = ClusterGraph::from_links(&links, RegionId::new(99));
/// let merges = StageRunner::default().run(&mut graph)?;
/// assert_eq!(merges.len(), 1);
/// assert_eq!(merges[0].stage, Stage::Global);
/// assert_eq!(graph.live_count(), 1);
/// # Ok::<(), guzman_core::InvariantViolation>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRunner {
    link_threshold: NonZeroU32,
    single_body_stage: bool,
    round_policy: RoundPolicy,
}

impl Default for StageRunner {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_THRESHOLD, true, RoundPolicy::default())
    }
}

impl StageRunner {
    /// Creates a runner from explicit settings.
    #[must_use]
    pub const fn new(
        link_threshold: NonZeroU32,
        single_body_stage: bool,
        round_policy: RoundPolicy,
    ) -> Self {
        Self {
            link_threshold,
            single_body_stage,
            round_policy,
        }
    }

    /// Returns the minimum link count that lets GLOBAL merge two clusters.
    #[must_use]
    pub const fn link_threshold(&self) -> NonZeroU32 {
        self.link_threshold
    }

    /// Reports whether the SINGLEBODY pass runs after GLOBAL.
    #[must_use]
    pub const fn single_body_stage(&self) -> bool {
        self.single_body_stage
    }

    /// Returns the configured round policy.
    #[must_use]
    pub const fn round_policy(&self) -> RoundPolicy {
        self.round_policy
    }

    /// Runs the passes over `graph` and returns the merges in the order they
    /// were applied.
    ///
    /// # Errors
    /// Returns an [`InvariantViolation`] if a merge breaches the graph
    /// invariants or the merge budget runs out.
    #[instrument(
        name = "core.stages",
        skip(self, graph),
        fields(
            clusters = graph.live_count(),
            threshold = self.link_threshold.get(),
            policy = ?self.round_policy,
        ),
    )]
    pub fn run(&self, graph: &mut ClusterGraph) -> Result<Vec<MergeEvent>, InvariantViolation> {
        let mut ledger = MergeLedger::new(graph.live_count());
        let mut round = 0usize;
        loop {
            round += 1;
            let before = ledger.events.len();
            global::run_global(graph, self.link_threshold, &mut ledger)?;
            if self.single_body_stage {
                single_body::run_single_body(graph, &mut ledger)?;
            }
            let merged = ledger.events.len() - before;
            debug!(round, merges = merged, clusters = graph.live_count(), "round completed");
            if merged == 0 || self.round_policy == RoundPolicy::Single {
                break;
            }
        }
        Ok(ledger.events)
    }
}

/// Records applied merges and enforces the merge budget.
struct MergeLedger {
    budget: usize,
    events: Vec<MergeEvent>,
}

impl MergeLedger {
    fn new(clusters: usize) -> Self {
        Self {
            budget: clusters.saturating_sub(1),
            events: Vec::new(),
        }
    }

    fn apply(
        &mut self,
        graph: &mut ClusterGraph,
        stage: Stage,
        rule: MergeRule,
        target: ClusterHandle,
        source: ClusterHandle,
    ) -> Result<(), InvariantViolation> {
        if self.events.len() >= self.budget {
            return Err(InvariantViolation::MergeBudgetExceeded {
                budget: self.budget,
            });
        }
        let outcome = graph.merge(target, source)?;
        self.events.push(MergeEvent {
            stage,
            rule,
            target: outcome.target_regions,
            absorbed: outcome.absorbed_regions,
        });
        Ok(())
    }
}

/// Snapshot of the live clusters in scan order, with each handle's position.
struct ScanOrder {
    handles: Vec<ClusterHandle>,
    rank: BTreeMap<ClusterHandle, usize>,
}

impl ScanOrder {
    fn capture(graph: &ClusterGraph) -> Result<Self, InvariantViolation> {
        let handles = graph.scan_order()?;
        let rank = handles
            .iter()
            .enumerate()
            .map(|(position, &handle)| (handle, position))
            .collect();
        Ok(Self { handles, rank })
    }

    fn rank_of(
        &self,
        origin: ClusterHandle,
        target: ClusterHandle,
    ) -> Result<usize, InvariantViolation> {
        self.rank
            .get(&target)
            .copied()
            .ok_or(InvariantViolation::DanglingEdge { origin, target })
    }
}
