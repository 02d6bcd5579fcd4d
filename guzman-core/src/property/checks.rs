//! Property runners shared by the proptest and rstest suites.

use std::collections::BTreeSet;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    graph::ClusterGraph,
    grouper::group_regions,
    region::RegionId,
    stages::StageRunner,
};

use super::types::LinkFixture;

fn fail(fixture: &LinkFixture, message: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(format!(
        "{message} (topology={:?}, links={}, background={})",
        fixture.topology,
        fixture.links.len(),
        fixture.background,
    ))
}

fn expected_regions(fixture: &LinkFixture) -> BTreeSet<RegionId> {
    fixture
        .links
        .iter()
        .flat_map(|link| {
            let (first, second) = link.regions();
            [first, second]
        })
        .filter(|&region| region != fixture.background)
        .collect()
}

/// Sum of every recorded link count; each edge is seen from both ends.
fn total_link_weight(graph: &ClusterGraph) -> u64 {
    graph
        .live_clusters()
        .flat_map(|(_, cluster)| cluster.links().map(|(_, count)| u64::from(count)))
        .sum()
}

/// Bodies are disjoint, cover exactly the non-background regions and come
/// out ordered by their smallest region.
pub(super) fn run_partition_property(fixture: &LinkFixture) -> TestCaseResult {
    let result = group_regions(&fixture.links, Some(fixture.background))
        .map_err(|err| fail(fixture, format!("grouping failed: {err}")))?;

    let expected = expected_regions(fixture);
    let mut seen = BTreeSet::new();
    for body in result.bodies() {
        if body.is_empty() {
            return Err(fail(fixture, "empty body"));
        }
        for &region in body.regions() {
            if !seen.insert(region) {
                return Err(fail(fixture, format!("region {region} appears in two bodies")));
            }
        }
    }
    if seen != expected {
        return Err(fail(
            fixture,
            format!("bodies cover {seen:?}, expected {expected:?}"),
        ));
    }

    let smallest: Vec<RegionId> = result.bodies().iter().map(|b| b.smallest_region()).collect();
    if smallest.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(fail(fixture, format!("bodies out of order: {smallest:?}")));
    }
    Ok(())
}

/// Merging any linked pair keeps the graph symmetric, removes exactly one
/// live cluster and drops exactly the joining links from the total weight.
pub(super) fn run_merge_invariants_property(fixture: &LinkFixture) -> TestCaseResult {
    let mut graph = ClusterGraph::from_links(&fixture.links, fixture.background);
    graph
        .check_invariants()
        .map_err(|err| fail(fixture, format!("fresh graph inconsistent: {err}")))?;
    let regions = graph.region_count();

    loop {
        let order = graph
            .scan_order()
            .map_err(|err| fail(fixture, format!("scan order failed: {err}")))?;
        let pair = order.iter().find_map(|&handle| {
            graph
                .cluster(handle)
                .ok()
                .and_then(|cluster| cluster.links().next())
                .map(|(neighbour, _)| (handle, neighbour))
        });
        let Some((target, source)) = pair else {
            break;
        };

        let live_before = graph.live_count();
        let weight_before = total_link_weight(&graph);
        let outcome = graph
            .merge(target, source)
            .map_err(|err| fail(fixture, format!("merge failed: {err}")))?;

        graph
            .check_invariants()
            .map_err(|err| fail(fixture, format!("invariant broken after merge: {err}")))?;
        if graph.live_count() + 1 != live_before {
            return Err(fail(fixture, "merge did not remove exactly one cluster"));
        }
        if graph.region_count() != regions {
            return Err(fail(fixture, "merge changed the indexed region count"));
        }
        let expected_weight = weight_before - 2 * u64::from(outcome.joining_links);
        if total_link_weight(&graph) != expected_weight {
            return Err(fail(fixture, "merge did not conserve third-party link counts"));
        }
    }
    Ok(())
}

/// A completed run is a fixpoint: running the stages again merges nothing,
/// and the merge log accounts for every cluster that disappeared.
pub(super) fn run_fixpoint_property(fixture: &LinkFixture) -> TestCaseResult {
    let runner = StageRunner::default();
    let mut graph = ClusterGraph::from_links(&fixture.links, fixture.background);
    let initial = graph.live_count();
    let merges = runner
        .run(&mut graph)
        .map_err(|err| fail(fixture, format!("first run failed: {err}")))?;
    if initial - graph.live_count() != merges.len() {
        return Err(fail(fixture, "merge log does not match cluster shrinkage"));
    }
    let again = runner
        .run(&mut graph)
        .map_err(|err| fail(fixture, format!("second run failed: {err}")))?;
    if !again.is_empty() {
        return Err(fail(
            fixture,
            format!("second run performed {} merge(s)", again.len()),
        ));
    }
    Ok(())
}

/// Identical input yields identical bodies and an identical merge log.
pub(super) fn run_determinism_property(fixture: &LinkFixture) -> TestCaseResult {
    let first = group_regions(&fixture.links, Some(fixture.background))
        .map_err(|err| fail(fixture, format!("first grouping failed: {err}")))?;
    let second = group_regions(&fixture.links, Some(fixture.background))
        .map_err(|err| fail(fixture, format!("second grouping failed: {err}")))?;
    if first != second {
        return Err(fail(fixture, "repeated runs disagree"));
    }
    Ok(())
}
