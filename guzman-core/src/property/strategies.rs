//! Strategy builders for grouping property tests.
//!
//! Each generator produces a non-empty link list over regions `1..=n` using a
//! seeded [`SmallRng`], so a failing case can be replayed from its seed.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::region::{RegionId, RegionLink};

use super::types::{LinkFixture, LinkTopology};

/// Minimum number of distinct regions in a generated drawing.
const MIN_REGIONS: i64 = 2;
/// Maximum number of distinct regions in a generated drawing.
const MAX_REGIONS: i64 = 24;
/// Region id used when the background should not appear in the links.
const ABSENT_BACKGROUND: i64 = 0;

/// Generates fixtures covering every [`LinkTopology`].
pub(super) fn link_fixture_strategy() -> impl Strategy<Value = LinkFixture> {
    (any::<LinkTopology>(), any::<u64>()).prop_map(|(topology, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(topology, &mut rng)
    })
}

/// Generates a fixture for a specific topology.
pub(super) fn generate_fixture(topology: LinkTopology, rng: &mut SmallRng) -> LinkFixture {
    let regions = rng.gen_range(MIN_REGIONS..=MAX_REGIONS);
    let mut pairs = match topology {
        LinkTopology::Scattered => scattered(rng, regions),
        LinkTopology::Chain => chain(rng, regions),
        LinkTopology::Clustered => clustered(rng, regions),
        LinkTopology::Star => star(rng, regions),
    };
    if pairs.is_empty() {
        pairs.push((1, 2));
    }
    // A quarter of the fixtures name a region that actually occurs.
    let background = if rng.gen_bool(0.25) {
        rng.gen_range(1..=regions)
    } else {
        ABSENT_BACKGROUND
    };
    let links = pairs
        .into_iter()
        .enumerate()
        .map(|(junction, (first, second))| RegionLink::new(first, second, format!("J{junction}")))
        .collect();
    LinkFixture {
        links,
        background: RegionId::new(background),
        topology,
    }
}

fn scattered(rng: &mut SmallRng, regions: i64) -> Vec<(i64, i64)> {
    let count = rng.gen_range(1..=regions.saturating_mul(2));
    (0..count)
        .map(|_| (rng.gen_range(1..=regions), rng.gen_range(1..=regions)))
        .collect()
}

fn chain(rng: &mut SmallRng, regions: i64) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    for region in 1..regions {
        pairs.push((region, region + 1));
        if rng.gen_bool(0.3) {
            pairs.push((region + 1, region));
        }
    }
    pairs
}

fn clustered(rng: &mut SmallRng, regions: i64) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    let mut start = 1;
    while start <= regions {
        let end = (start + rng.gen_range(1..=3)).min(regions);
        for first in start..=end {
            for second in (first + 1)..=end {
                if rng.gen_bool(0.8) {
                    pairs.push((first, second));
                }
                if rng.gen_bool(0.3) {
                    pairs.push((second, first));
                }
            }
        }
        start = end + 1;
    }
    for _ in 0..(regions / 3) {
        pairs.push((rng.gen_range(1..=regions), rng.gen_range(1..=regions)));
    }
    pairs
}

fn star(rng: &mut SmallRng, regions: i64) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    for leaf in 2..=regions {
        pairs.push((1, leaf));
        if leaf < regions && rng.gen_bool(0.2) {
            pairs.push((leaf, leaf + 1));
        }
    }
    pairs
}
