//! Builder utilities for configuring grouping runs.
//!
//! Exposes the stage knobs and the validation performed before a
//! [`Grouper`] is constructed.

use std::num::NonZeroU32;

use crate::{
    Result,
    error::GroupingError,
    grouper::Grouper,
    stages::{RoundPolicy, StageRunner},
};

/// Configures and constructs [`Grouper`] instances.
///
/// # Examples
/// ```
/// use guzman_core::{GroupingBuilder, RoundPolicy};
///
/// let grouper = GroupingBuilder::new()
///     .with_link_threshold(3)
///     .with_round_policy(RoundPolicy::Single)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(grouper.link_threshold().get(), 3);
/// assert_eq!(grouper.round_policy(), RoundPolicy::Single);
/// ```
#[derive(Debug, Clone)]
pub struct GroupingBuilder {
    link_threshold: u32,
    single_body_stage: bool,
    round_policy: RoundPolicy,
}

impl Default for GroupingBuilder {
    fn default() -> Self {
        let runner = StageRunner::default();
        Self {
            link_threshold: runner.link_threshold().get(),
            single_body_stage: runner.single_body_stage(),
            round_policy: runner.round_policy(),
        }
    }
}

impl GroupingBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::{GroupingBuilder, RoundPolicy};
    ///
    /// let builder = GroupingBuilder::new();
    /// assert_eq!(builder.link_threshold(), 2);
    /// assert!(builder.single_body_stage());
    /// assert_eq!(builder.round_policy(), RoundPolicy::UntilStable);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of links GLOBAL needs to merge two clusters.
    #[must_use]
    pub fn with_link_threshold(mut self, threshold: u32) -> Self {
        self.link_threshold = threshold;
        self
    }

    /// Returns the configured GLOBAL link threshold.
    #[must_use]
    pub fn link_threshold(&self) -> u32 {
        self.link_threshold
    }

    /// Enables or disables the SINGLEBODY pass.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::GroupingBuilder;
    ///
    /// let builder = GroupingBuilder::new().with_single_body_stage(false);
    /// assert!(!builder.single_body_stage());
    /// ```
    #[must_use]
    pub fn with_single_body_stage(mut self, enabled: bool) -> Self {
        self.single_body_stage = enabled;
        self
    }

    /// Reports whether the SINGLEBODY pass is enabled.
    #[must_use]
    pub fn single_body_stage(&self) -> bool {
        self.single_body_stage
    }

    /// Sets whether the GLOBAL→SINGLEBODY round repeats until stable.
    #[must_use]
    pub fn with_round_policy(mut self, policy: RoundPolicy) -> Self {
        self.round_policy = policy;
        self
    }

    /// Returns the configured round policy.
    #[must_use]
    pub fn round_policy(&self) -> RoundPolicy {
        self.round_policy
    }

    /// Validates the configuration and constructs a [`Grouper`].
    ///
    /// # Errors
    /// Returns [`GroupingError::InvalidLinkThreshold`] when the link
    /// threshold is zero.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::{GroupingBuilder, GroupingError};
    ///
    /// let err = GroupingBuilder::new().with_link_threshold(0).build().unwrap_err();
    /// assert_eq!(err, GroupingError::InvalidLinkThreshold { got: 0 });
    /// ```
    pub fn build(self) -> Result<Grouper> {
        let link_threshold =
            NonZeroU32::new(self.link_threshold).ok_or(GroupingError::InvalidLinkThreshold {
                got: self.link_threshold,
            })?;

        Ok(Grouper::new(StageRunner::new(
            link_threshold,
            self.single_body_stage,
            self.round_policy,
        )))
    }
}
