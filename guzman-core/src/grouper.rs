//! Region-grouping orchestration.
//!
//! Provides the [`Grouper`] entry point that validates input, builds the
//! cluster graph, runs the stages and extracts the bodies.

use std::num::NonZeroU32;

use tracing::{Span, field, info, instrument, warn};

use crate::{
    Result,
    error::GroupingError,
    graph::ClusterGraph,
    region::{RegionId, RegionLink},
    result::{GroupingResult, extract_bodies},
    stages::{RoundPolicy, StageRunner},
};

/// Entry point for grouping regions into bodies.
///
/// A `Grouper` holds configuration only. Every call to [`Grouper::group`]
/// builds and owns its own cluster graph, so one instance can serve
/// concurrent callers.
///
/// # Examples
/// ```
/// use guzman_core::{GroupingBuilder, RegionId, RegionLink};
///
/// let grouper = GroupingBuilder::new().build().expect("defaults are valid");
/// let links = [RegionLink::new(1, 2, "A"), RegionLink::new(1, 2, "B")];
/// let result = grouper.group(&links, Some(RegionId::new(99)))?;
/// assert_eq!(result.body_count(), 1);
/// assert_eq!(result.bodies()[0].len(), 2);
/// # Ok::<(), guzman_core::GroupingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Grouper {
    runner: StageRunner,
}

impl Grouper {
    pub(crate) fn new(runner: StageRunner) -> Self {
        Self { runner }
    }

    /// Returns the GLOBAL link threshold.
    #[must_use]
    pub fn link_threshold(&self) -> NonZeroU32 {
        self.runner.link_threshold()
    }

    /// Reports whether the SINGLEBODY pass runs.
    #[must_use]
    pub fn single_body_stage(&self) -> bool {
        self.runner.single_body_stage()
    }

    /// Returns the round policy.
    #[must_use]
    pub fn round_policy(&self) -> RoundPolicy {
        self.runner.round_policy()
    }

    /// Partitions every non-background region mentioned in `links` into
    /// bodies.
    ///
    /// # Errors
    /// Returns [`GroupingError::EmptyInput`] when `links` is empty,
    /// [`GroupingError::MissingBackground`] when `background` is `None`, and
    /// [`GroupingError::Invariant`] if the engine breaches one of its own
    /// invariants.
    #[instrument(
        name = "core.group",
        err,
        skip(self, links, background),
        fields(links = links.len(), background = field::Empty, bodies = field::Empty),
    )]
    pub fn group(
        &self,
        links: &[RegionLink],
        background: Option<RegionId>,
    ) -> Result<GroupingResult> {
        let background = validate_input(links, background)?;
        let span = Span::current();
        span.record("background", field::display(background));

        let mut graph = ClusterGraph::from_links(links, background);
        let merges = self.runner.run(&mut graph)?;
        let bodies = extract_bodies(&graph)?;

        span.record("bodies", bodies.len());
        info!(
            regions = graph.region_count(),
            bodies = bodies.len(),
            merges = merges.len(),
            "grouping completed"
        );
        Ok(GroupingResult::new(bodies, merges))
    }
}

/// Checks the input contract before any graph is built.
///
/// # Errors
/// Returns [`GroupingError::EmptyInput`] when `links` is empty and
/// [`GroupingError::MissingBackground`] when `background` is `None`.
///
/// # Examples
/// ```
/// use guzman_core::{GroupingError, RegionId, RegionLink, validate_input};
///
/// assert_eq!(validate_input(&[], Some(RegionId::new(1))), Err(GroupingError::EmptyInput));
/// let links = [RegionLink::new(1, 2, "A")];
/// assert_eq!(validate_input(&links, None), Err(GroupingError::MissingBackground));
/// assert_eq!(validate_input(&links, Some(RegionId::new(9))), Ok(RegionId::new(9)));
/// ```
pub fn validate_input(links: &[RegionLink], background: Option<RegionId>) -> Result<RegionId> {
    if links.is_empty() {
        warn!("no region links provided, returning error");
        return Err(GroupingError::EmptyInput);
    }
    background.ok_or_else(|| {
        warn!(links = links.len(), "background region not specified, returning error");
        GroupingError::MissingBackground
    })
}

/// Groups `links` with the default configuration.
///
/// # Errors
/// See [`Grouper::group`].
///
/// # Examples
/// ```
/// use guzman_core::{RegionId, RegionLink, group_regions};
///
/// let links = [RegionLink::new(1, 99, "A"), RegionLink::new(1, 2, "B")];
/// let result = group_regions(&links, Some(RegionId::new(99)))?;
/// assert_eq!(result.body_count(), 1);
/// # Ok::<(), guzman_core::GroupingError>(())
/// ```
pub fn group_regions(links: &[RegionLink], background: Option<RegionId>) -> Result<GroupingResult> {
    Grouper::default().group(links, background)
}
