//! Region identifiers and the junction-derived links between them.
//!
//! Regions are opaque integers handed over by the upstream junction analysis.
//! The engine never creates or destroys them; it only groups them.

use std::{fmt, sync::Arc};

/// Identifier of a 2-D face of the line drawing.
///
/// # Examples
/// ```
/// use guzman_core::RegionId;
///
/// let region = RegionId::new(7);
/// assert_eq!(region.get(), 7);
/// assert_eq!(region.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(i64);

impl RegionId {
    /// Wraps a raw region number.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: i64) -> Self { Self(id) }

    /// Returns the raw region number.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> i64 { self.0 }
}

impl From<i64> for RegionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hint that two regions may belong to the same 3-D surface, attributed to
/// the junction that produced it.
///
/// # Examples
/// ```
/// use guzman_core::{RegionId, RegionLink};
///
/// let link = RegionLink::new(1, 2, "A");
/// assert_eq!(link.regions(), (RegionId::new(1), RegionId::new(2)));
/// assert_eq!(link.via(), "A");
/// assert!(link.touches(RegionId::new(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionLink {
    first: RegionId,
    second: RegionId,
    via: Arc<str>,
}

impl RegionLink {
    /// Creates a link between `first` and `second` observed at junction `via`.
    #[must_use]
    pub fn new(
        first: impl Into<RegionId>,
        second: impl Into<RegionId>,
        via: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            via: via.into(),
        }
    }

    /// Returns both linked regions in input order.
    #[must_use]
    pub const fn regions(&self) -> (RegionId, RegionId) {
        (self.first, self.second)
    }

    /// Returns the identifier of the junction that produced the link.
    #[must_use]
    pub fn via(&self) -> &str {
        &self.via
    }

    /// Reports whether either end of the link is `region`.
    #[must_use]
    pub fn touches(&self, region: RegionId) -> bool {
        self.first == region || self.second == region
    }

    /// Reports whether both ends name the same region.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.first == self.second
    }
}

impl fmt::Display for RegionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} via {}", self.first, self.second, self.via)
    }
}
