//! Guzman core library.
//!
//! Groups the regions of a line drawing into 3-D bodies from junction-derived
//! region links. The pipeline builds a graph of single-region clusters
//! ([`ClusterGraph::from_links`]), drives it to a fixpoint with the GLOBAL and
//! SINGLEBODY passes ([`StageRunner`]), and reports the surviving clusters as
//! [`Body`] values ordered by their smallest region.
//!
//! Junction classification and link derivation happen upstream; this crate
//! only consumes their output.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod graph;
mod grouper;
mod region;
mod result;
mod stages;

#[cfg(test)]
mod property;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::GroupingBuilder,
    error::{GroupingError, GroupingErrorCode, InvariantViolation, InvariantViolationCode, Result},
    graph::{Cluster, ClusterGraph, ClusterHandle, MergeOutcome},
    grouper::{Grouper, group_regions, validate_input},
    region::{RegionId, RegionLink},
    result::{Body, GroupingResult},
    stages::{MergeEvent, MergeRule, RoundPolicy, Stage, StageRunner},
};
