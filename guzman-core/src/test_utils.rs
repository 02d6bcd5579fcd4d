//! Shared test utilities for `guzman-core`.

use guzman_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{region::RegionLink, result::GroupingResult};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `GUZMAN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Expands `(region, region, junction)` triples into links.
pub(crate) fn links(raw: &[(i64, i64, &str)]) -> Vec<RegionLink> {
    raw.iter()
        .map(|&(first, second, via)| RegionLink::new(first, second, via))
        .collect()
}

/// Flattens a result into sorted region numbers per body.
pub(crate) fn body_sets(result: &GroupingResult) -> Vec<Vec<i64>> {
    result
        .bodies()
        .iter()
        .map(|body| body.regions().iter().map(|region| region.get()).collect())
        .collect()
}
