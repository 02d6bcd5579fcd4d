use guzman_core::{GroupingResult, RegionId, RegionLink};

/// Background region used by the scenario drawings.
pub const BACKGROUND: RegionId = RegionId::new(99);

/// Expands `(region, region, junction)` triples into links.
#[must_use]
pub fn links(raw: &[(i64, i64, &str)]) -> Vec<RegionLink> {
    raw.iter()
        .map(|&(first, second, via)| RegionLink::new(first, second, via))
        .collect()
}

/// Flattens a result into region numbers per body, in output order.
#[must_use]
pub fn body_sets(result: &GroupingResult) -> Vec<Vec<i64>> {
    result
        .bodies()
        .iter()
        .map(|body| body.regions().iter().map(|region| region.get()).collect())
        .collect()
}
