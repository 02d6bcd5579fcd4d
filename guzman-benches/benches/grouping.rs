//! End-to-end grouping benchmarks.
//!
//! Times `group_regions` on synthetic scenes of growing size, covering input
//! validation, graph construction, both merge passes and body extraction.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use guzman_benches::{
    error::BenchSetupError,
    params::SceneBenchParams,
    scene::{BACKGROUND, SceneConfig, SyntheticScene},
};
use guzman_core::GroupingBuilder;

/// Seed used for all scene generation in this benchmark.
const SEED: u64 = 42;

/// Body counts to benchmark.
const BODY_COUNTS: &[usize] = &[8, 32, 128];

/// Regions in each generated body.
const REGIONS_PER_BODY: usize = 6;

fn grouping_end_to_end_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("group_regions");
    group.sample_size(30);
    let grouper = GroupingBuilder::new().build()?;

    for &bodies in BODY_COUNTS {
        let scene = SyntheticScene::generate(&SceneConfig {
            bodies,
            regions_per_body: REGIONS_PER_BODY,
            double_link_ratio: 0.5,
            stray_links: bodies,
            seed: SEED,
        })?;
        // Fail setup rather than time an erroring run.
        grouper.group(scene.links(), Some(BACKGROUND))?;

        let params = SceneBenchParams {
            bodies,
            regions_per_body: REGIONS_PER_BODY,
        };
        group.throughput(Throughput::Elements(scene.links().len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(&params),
            &scene,
            |b, scene| {
                b.iter(|| grouper.group(scene.links(), Some(BACKGROUND)));
            },
        );
    }

    group.finish();
    Ok(())
}

fn grouping_end_to_end(c: &mut Criterion) {
    if let Err(err) = grouping_end_to_end_impl(c) {
        panic!("group_regions benchmark setup failed: {err}");
    }
}

criterion_group!(benches, grouping_end_to_end);
criterion_main!(benches);
