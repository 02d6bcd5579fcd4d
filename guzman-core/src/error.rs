//! Error types for the guzman core library.
//!
//! Input validation failures and engine invariant breaches are kept apart so
//! callers can tell bad input from an engine bug. Both carry stable
//! machine-readable codes.

use std::fmt;

use thiserror::Error;

use crate::{graph::ClusterHandle, region::RegionId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A structural breach of the cluster graph detected while grouping.
///
/// These never stem from user input; a well-formed build step cannot produce
/// them. They are reported rather than panicking so hosts can log the engine
/// state that led to them.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvariantViolation {
    /// A region is owned by more than one live cluster.
    #[error("region {region} is owned by clusters {first} and {second}")]
    RegionInTwoClusters {
        /// Region found twice.
        region: RegionId,
        /// Cluster the region was first seen in.
        first: ClusterHandle,
        /// Second cluster claiming the region.
        second: ClusterHandle,
    },
    /// A live cluster still records an edge to a discarded cluster.
    #[error("cluster {origin} holds an edge to discarded cluster {target}")]
    DanglingEdge {
        /// Cluster holding the stale edge.
        origin: ClusterHandle,
        /// Discarded cluster the edge points at.
        target: ClusterHandle,
    },
    /// Two clusters disagree on the link count between them.
    #[error("cluster {origin} records {forward} link(s) to {target}, which records {backward}")]
    AsymmetricLink {
        /// Cluster whose edge was inspected first.
        origin: ClusterHandle,
        /// Neighbouring cluster.
        target: ClusterHandle,
        /// Count recorded by `origin`.
        forward: u32,
        /// Count recorded by `target`, zero when absent.
        backward: u32,
    },
    /// A cluster records an edge to itself.
    #[error("cluster {cluster} holds a link to itself")]
    SelfLink {
        /// Offending cluster.
        cluster: ClusterHandle,
    },
    /// A merge named the same cluster as both target and source.
    #[error("cluster {cluster} cannot be merged into itself")]
    SelfMerge {
        /// Cluster named twice.
        cluster: ClusterHandle,
    },
    /// A discarded or never-allocated cluster was read.
    #[error("cluster {cluster} is not live")]
    DiscardedCluster {
        /// Handle that no longer refers to a live cluster.
        cluster: ClusterHandle,
    },
    /// A live cluster holds no regions.
    #[error("cluster {cluster} has no regions")]
    EmptyCluster {
        /// Offending cluster.
        cluster: ClusterHandle,
    },
    /// The region index points a region at a cluster that does not hold it.
    #[error("region {region} is indexed to cluster {cluster}, which does not contain it")]
    IndexMismatch {
        /// Region whose index entry is stale.
        region: RegionId,
        /// Cluster named by the index.
        cluster: ClusterHandle,
    },
    /// A region held by a live cluster is missing from the index.
    #[error("region {region} in cluster {cluster} is missing from the region index")]
    UnindexedRegion {
        /// Region missing from the index.
        region: RegionId,
        /// Cluster holding the region.
        cluster: ClusterHandle,
    },
    /// More merges were requested than the initial cluster count allows.
    #[error("merge budget of {budget} exhausted")]
    MergeBudgetExceeded {
        /// Maximum number of merges available to the run.
        budget: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`InvariantViolation`] variants.
    enum InvariantViolationCode for InvariantViolation {
        /// A region is owned by more than one live cluster.
        RegionInTwoClusters => RegionInTwoClusters { .. } => "INVARIANT_REGION_IN_TWO_CLUSTERS",
        /// A live cluster still records an edge to a discarded cluster.
        DanglingEdge => DanglingEdge { .. } => "INVARIANT_DANGLING_EDGE",
        /// Two clusters disagree on the link count between them.
        AsymmetricLink => AsymmetricLink { .. } => "INVARIANT_ASYMMETRIC_LINK",
        /// A cluster records an edge to itself.
        SelfLink => SelfLink { .. } => "INVARIANT_SELF_LINK",
        /// A merge named the same cluster as both target and source.
        SelfMerge => SelfMerge { .. } => "INVARIANT_SELF_MERGE",
        /// A discarded or never-allocated cluster was read.
        DiscardedCluster => DiscardedCluster { .. } => "INVARIANT_DISCARDED_CLUSTER",
        /// A live cluster holds no regions.
        EmptyCluster => EmptyCluster { .. } => "INVARIANT_EMPTY_CLUSTER",
        /// The region index points a region at a cluster that does not hold it.
        IndexMismatch => IndexMismatch { .. } => "INVARIANT_INDEX_MISMATCH",
        /// A region held by a live cluster is missing from the index.
        UnindexedRegion => UnindexedRegion { .. } => "INVARIANT_UNINDEXED_REGION",
        /// More merges were requested than the initial cluster count allows.
        MergeBudgetExceeded => MergeBudgetExceeded { .. } => "INVARIANT_MERGE_BUDGET_EXCEEDED",
    }
}

/// Error type produced when configuring or running a [`crate::Grouper`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GroupingError {
    /// No region links were supplied.
    #[error("no region links were provided")]
    EmptyInput,
    /// The background region was not specified.
    #[error("background region was not specified")]
    MissingBackground,
    /// The GLOBAL link threshold must be positive.
    #[error("link_threshold must be at least 1 (got {got})")]
    InvalidLinkThreshold {
        /// The rejected threshold.
        got: u32,
    },
    /// The engine breached one of its own invariants.
    #[error("grouping engine invariant violated: {violation}")]
    Invariant {
        /// Underlying breach.
        #[from]
        violation: InvariantViolation,
    },
}

define_error_codes! {
    /// Stable codes describing [`GroupingError`] variants.
    enum GroupingErrorCode for GroupingError {
        /// No region links were supplied.
        EmptyInput => EmptyInput => "GUZMAN_EMPTY_INPUT",
        /// The background region was not specified.
        MissingBackground => MissingBackground => "GUZMAN_MISSING_BACKGROUND",
        /// The GLOBAL link threshold must be positive.
        InvalidLinkThreshold => InvalidLinkThreshold { .. } => "GUZMAN_INVALID_LINK_THRESHOLD",
        /// The engine breached one of its own invariants.
        InvariantViolation => Invariant { .. } => "GUZMAN_INVARIANT_VIOLATION",
    }
}

impl GroupingError {
    /// Reports whether the error was caused by the caller's input or
    /// configuration.
    ///
    /// # Examples
    /// ```
    /// use guzman_core::GroupingError;
    ///
    /// assert!(GroupingError::EmptyInput.is_input_error());
    /// assert!(!GroupingError::EmptyInput.is_internal());
    /// ```
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::MissingBackground | Self::InvalidLinkThreshold { .. }
        )
    }

    /// Reports whether the error is an engine fault rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Invariant { .. })
    }

    /// Retrieve the inner [`InvariantViolationCode`] when the engine breached
    /// an invariant.
    #[must_use]
    pub const fn invariant_code(&self) -> Option<InvariantViolationCode> {
        match self {
            Self::Invariant { violation } => Some(violation.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GroupingError>;
