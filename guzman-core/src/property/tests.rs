//! Property-based test runners for the grouping pipeline.
//!
//! Hosts proptest runners for the partition, merge-invariant, fixpoint and
//! determinism properties, plus rstest cases pinned to fixed seeds so every
//! topology is covered on each run.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::test_utils::{body_sets, links, suite_proptest_config};
use crate::{RegionId, group_regions};

use super::checks::{
    run_determinism_property, run_fixpoint_property, run_merge_invariants_property,
    run_partition_property,
};
use super::strategies::{generate_fixture, link_fixture_strategy};
use super::types::LinkTopology;

/// Generates an rstest-parameterised function that exercises a property
/// runner across each topology with fixed seeds.
macro_rules! parameterised_property_test {
    ($test_name:ident, $runner:path, $expectation:expr) => {
        #[rstest::rstest]
        #[case::scattered_42(LinkTopology::Scattered, 42)]
        #[case::scattered_999(LinkTopology::Scattered, 999)]
        #[case::chain_42(LinkTopology::Chain, 42)]
        #[case::chain_999(LinkTopology::Chain, 999)]
        #[case::clustered_42(LinkTopology::Clustered, 42)]
        #[case::clustered_999(LinkTopology::Clustered, 999)]
        #[case::clustered_7777(LinkTopology::Clustered, 7777)]
        #[case::star_42(LinkTopology::Star, 42)]
        #[case::star_999(LinkTopology::Star, 999)]
        fn $test_name(#[case] topology: LinkTopology, #[case] seed: u64) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let fixture = generate_fixture(topology, &mut rng);
            $runner(&fixture).expect($expectation);
        }
    };
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn grouping_partitions_regions(fixture in link_fixture_strategy()) {
        run_partition_property(&fixture)?;
    }

    #[test]
    fn merges_preserve_graph_invariants(fixture in link_fixture_strategy()) {
        run_merge_invariants_property(&fixture)?;
    }

    #[test]
    fn stages_reach_a_fixpoint(fixture in link_fixture_strategy()) {
        run_fixpoint_property(&fixture)?;
    }

    #[test]
    fn grouping_is_deterministic(fixture in link_fixture_strategy()) {
        run_determinism_property(&fixture)?;
    }
}

parameterised_property_test!(
    partition_holds_for_seeded_fixtures,
    run_partition_property,
    "partition property must hold"
);
parameterised_property_test!(
    merge_invariants_hold_for_seeded_fixtures,
    run_merge_invariants_property,
    "merge invariants must hold"
);
parameterised_property_test!(
    fixpoint_holds_for_seeded_fixtures,
    run_fixpoint_property,
    "stages must reach a fixpoint"
);
parameterised_property_test!(
    determinism_holds_for_seeded_fixtures,
    run_determinism_property,
    "grouping must be deterministic"
);

#[rstest::rstest]
#[case::scattered(LinkTopology::Scattered)]
#[case::chain(LinkTopology::Chain)]
#[case::clustered(LinkTopology::Clustered)]
#[case::star(LinkTopology::Star)]
fn generated_fixtures_are_never_empty(#[case] topology: LinkTopology) {
    for seed in 0..32 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fixture = generate_fixture(topology, &mut rng);
        assert!(!fixture.links.is_empty(), "seed {seed} produced no links");
        assert_eq!(fixture.topology, topology);
    }
}

#[rstest::rstest]
fn link_order_does_not_change_bodies() {
    let forward = links(&[(1, 2, "A"), (2, 3, "B"), (3, 4, "C"), (3, 5, "D"), (5, 6, "E")]);
    let mut backward = forward.clone();
    backward.reverse();
    let background = Some(RegionId::new(0));
    let first = group_regions(&forward, background).expect("forward grouping must succeed");
    let second = group_regions(&backward, background).expect("backward grouping must succeed");
    assert_eq!(body_sets(&first), body_sets(&second));
}
