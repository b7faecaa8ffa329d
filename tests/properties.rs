use std::collections::HashSet;

use proptest::prelude::*;
use u_deploy::coverage::CoverageMatrix;
use u_deploy::enumeration::{ConfigurationEnumerator, MobilityRule};
use u_deploy::experiment::log_spaced_sizes;
use u_deploy::models::{BaseSet, Configuration, ZoneGraph};

fn grid_with_bases() -> impl Strategy<Value = (usize, usize, Vec<usize>)> {
    (1usize..=3, 1usize..=3).prop_flat_map(|(w, h)| {
        let n = w * h;
        (
            Just(w),
            Just(h),
            prop::collection::vec(0..n, 1..=n).prop_map(|mut bases| {
                bases.sort_unstable();
                bases.dedup();
                bases
            }),
        )
    })
}

fn mobility_rule() -> impl Strategy<Value = MobilityRule> {
    prop_oneof![Just(MobilityRule::BaseAnchored), Just(MobilityRule::FreeRoaming)]
}

/// Brute-force coverage: vehicles standing on a zone or one of its neighbours.
fn naive_coverage(
    graph: &ZoneGraph,
    configs: &[Configuration],
    multiplicity: &[u32],
) -> Vec<u32> {
    (0..graph.num_zones())
        .map(|zone| {
            configs
                .iter()
                .zip(multiplicity)
                .map(|(config, &m)| {
                    let periods = config
                        .positions()
                        .iter()
                        .filter(|&&p| p == zone || graph.is_adjacent(p, zone))
                        .count() as u32;
                    periods * m
                })
                .sum()
        })
        .collect()
}

proptest! {
    #[test]
    fn test_enumeration_matches_count_and_moves_along_edges(
        (w, h, base_indices) in grid_with_bases(),
        horizon in 1usize..=4,
        rule in mobility_rule(),
    ) {
        let graph = ZoneGraph::grid(w, h);
        let bases = BaseSet::from_indices(graph.num_zones(), &base_indices);
        let enumerator = ConfigurationEnumerator::new(&graph, &bases).with_rule(rule);

        for &base in bases.indices() {
            let configs = enumerator.enumerate(base, horizon).expect("base is valid");
            prop_assert_eq!(configs.len() as u128, enumerator.count(base, horizon));

            let distinct: HashSet<&Configuration> = configs.iter().collect();
            prop_assert_eq!(distinct.len(), configs.len());

            for config in &configs {
                prop_assert_eq!(config.horizon(), horizon);
                prop_assert_eq!(config.origin(), base);
                for step in config.positions().windows(2) {
                    prop_assert!(step[0] == step[1] || graph.is_adjacent(step[0], step[1]));
                    if rule == MobilityRule::BaseAnchored && !bases.contains(step[0]) {
                        prop_assert_eq!(step[0], step[1]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_coverage_matches_footprints(
        (w, h, base_indices) in grid_with_bases(),
        horizon in 1usize..=3,
        seed in prop::collection::vec(0u32..4, 1..64),
    ) {
        let graph = ZoneGraph::grid(w, h);
        let bases = BaseSet::from_indices(graph.num_zones(), &base_indices);
        let configs = ConfigurationEnumerator::new(&graph, &bases)
            .enumerate_pooled(horizon)
            .expect("bases are valid");
        let multiplicity: Vec<u32> = (0..configs.len()).map(|c| seed[c % seed.len()]).collect();

        let matrix = CoverageMatrix::build(&graph, &configs, horizon).expect("coverage builds");
        let expected = naive_coverage(&graph, &configs, &multiplicity);

        prop_assert_eq!(matrix.zone_coverage(&multiplicity), expected.clone());
        let spread = expected.iter().max().unwrap() - expected.iter().min().unwrap();
        prop_assert_eq!(matrix.fairness_gap(&multiplicity), spread);
    }

    #[test]
    fn test_log_spaced_sizes_span_the_range(
        min in 1usize..1000,
        extra in 0usize..100_000,
        steps in 2usize..12,
    ) {
        let max = min + extra;
        let sizes = log_spaced_sizes(min, max, steps).expect("valid range");

        prop_assert_eq!(sizes.first().copied(), Some(min));
        prop_assert_eq!(sizes.last().copied(), Some(max));
        prop_assert!(sizes.len() <= steps);
        prop_assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }
}
