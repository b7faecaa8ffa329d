use u_deploy::coverage::CoverageMatrix;
use u_deploy::enumeration::ConfigurationEnumerator;
use u_deploy::formulation::{
    BaseFormulation, ConsistencyFormulation, FairnessEncoding, Formulation, FormulationInput,
    FrequencyFormulation, PlanViolation,
};
use u_deploy::models::{BaseSet, Configuration, Zone, ZoneGraph};
use u_deploy::solver::{MicroLpSolver, MipSolver, SolveLimits, SolveOutcome, SolveStatus};

/// A, B and C pairwise adjacent.
fn triangle() -> ZoneGraph {
    let zones = [Zone::new(0.0, 0.0), Zone::new(1.0, 0.0), Zone::new(0.0, 1.0)];
    let edges = [(zones[0], zones[1]), (zones[0], zones[2]), (zones[1], zones[2])];
    ZoneGraph::from_edges(&zones, &edges)
}

fn solve(
    formulation: &dyn Formulation,
    graph: &ZoneGraph,
    configs: &[Configuration],
    num_vehicles: u32,
    bases: Option<&BaseSet>,
) -> SolveOutcome {
    solve_and_verify(formulation, graph, configs, num_vehicles, bases).0
}

/// Solves and checks the plan, if any, against the model input.
fn solve_and_verify(
    formulation: &dyn Formulation,
    graph: &ZoneGraph,
    configs: &[Configuration],
    num_vehicles: u32,
    bases: Option<&BaseSet>,
) -> (SolveOutcome, Vec<PlanViolation>) {
    let horizon = configs.first().map_or(0, Configuration::horizon);
    let coverage = CoverageMatrix::build(graph, configs, horizon).expect("coverage builds");
    let mut input =
        FormulationInput::new(graph, configs, &coverage, num_vehicles).expect("valid input");
    if let Some(bases) = bases {
        input = input.with_bases(bases).expect("same graph");
    }
    let model = formulation.build(&input).expect("model builds");
    let outcome = MicroLpSolver
        .solve(model, &SolveLimits::default())
        .expect("solver runs");
    let violations = outcome
        .plan()
        .map_or_else(Vec::new, |plan| plan.verify(&input));
    (outcome, violations)
}

fn objective(outcome: &SolveOutcome) -> f64 {
    outcome.objective.expect("objective present").round()
}

#[test]
fn test_enumeration_on_triangle() {
    let graph = triangle();
    let bases = BaseSet::from_indices(3, &[0]);

    let configs = ConfigurationEnumerator::new(&graph, &bases)
        .enumerate(0, 2)
        .expect("enumerates");

    let paths: Vec<_> = configs.iter().map(|c| c.positions().to_vec()).collect();
    assert_eq!(paths, vec![vec![0, 0], vec![0, 1], vec![0, 2]]);
}

#[test]
fn test_single_vehicle_base_model_on_path() {
    // A - B - C, base at A: [A,A] covers (2,2,0), [A,B] covers (2,2,1)
    let graph = ZoneGraph::grid(3, 1);
    let bases = BaseSet::from_indices(3, &[0]);
    let configs = ConfigurationEnumerator::new(&graph, &bases)
        .enumerate(0, 2)
        .expect("enumerates");
    assert_eq!(configs.len(), 2);

    let (outcome, violations) =
        solve_and_verify(&BaseFormulation::new(), &graph, &configs, 1, Some(&bases));

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(violations.is_empty(), "{violations:?}");
    assert_eq!(objective(&outcome), 1.0);
    let plan = outcome.plan().expect("plan present");
    assert_eq!(plan.multiplicity(), &[0, 1]);
    assert_eq!(plan.coverage(), &[2, 2, 1]);
}

#[test]
fn test_single_vehicle_base_model_on_triangle() {
    // every zone neighbours A, so any configuration covers all zones
    let graph = triangle();
    let bases = BaseSet::from_indices(3, &[0]);
    let configs = ConfigurationEnumerator::new(&graph, &bases)
        .enumerate(0, 2)
        .expect("enumerates");

    let outcome = solve(&BaseFormulation::new(), &graph, &configs, 1, Some(&bases));

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(objective(&outcome), 0.0);
    assert_eq!(outcome.plan().expect("plan present").num_vehicles(), 1);
}

#[test]
fn test_frequency_model_feasibility_follows_capacity() {
    let graph = ZoneGraph::grid(3, 1);
    let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];

    let feasible = solve(&FrequencyFormulation::new(2), &graph, &configs, 2, None);
    assert_eq!(feasible.status, SolveStatus::Optimal);
    assert_eq!(feasible.plan().expect("plan present").num_vehicles(), 2);

    let at_capacity = solve(&FrequencyFormulation::new(2), &graph, &configs, 4, None);
    assert_eq!(at_capacity.status, SolveStatus::Optimal);
    assert_eq!(at_capacity.plan().expect("plan present").multiplicity(), &[2, 2]);

    let over_capacity = solve(&FrequencyFormulation::new(2), &graph, &configs, 5, None);
    assert_eq!(over_capacity.status, SolveStatus::Infeasible);
    assert!(over_capacity.objective.is_none());
    assert!(over_capacity.plan().is_none());
}

#[test]
fn test_consistency_without_movement_keeps_occupancy() {
    let graph = ZoneGraph::grid(3, 1);
    let bases = BaseSet::from_indices(3, &[0]);
    let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];

    let (outcome, violations) =
        solve_and_verify(&ConsistencyFormulation::new(3, 0), &graph, &configs, 2, Some(&bases));

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(violations.is_empty(), "{violations:?}");
    let plan = outcome.plan().expect("plan present");
    assert_eq!(plan.multiplicity(), &[2, 0]);
    for row in plan.occupancy() {
        assert!(row.windows(2).all(|w| w[0] == w[1]), "occupancy changed: {row:?}");
    }
    assert!(plan.movements().is_empty());
    assert_eq!(objective(&outcome), 4.0);
}

#[test]
fn test_consistency_with_movement_budget() {
    let graph = ZoneGraph::grid(3, 1);
    let bases = BaseSet::from_indices(3, &[0]);
    let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];

    let outcome = solve(&ConsistencyFormulation::new(3, 10), &graph, &configs, 2, Some(&bases));

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let plan = outcome.plan().expect("plan present");
    assert_eq!(plan.multiplicity(), &[0, 2]);
    assert_eq!(plan.occupancy()[0], vec![2, 0]);
    assert_eq!(plan.occupancy()[1], vec![0, 2]);
    let net: i64 = plan
        .movements()
        .iter()
        .map(|m| match (m.from, m.to) {
            (0, 1) => i64::from(m.vehicles),
            (1, 0) => -i64::from(m.vehicles),
            _ => 0,
        })
        .sum();
    assert_eq!(net, 2);
    assert_eq!(objective(&outcome), 2.0);
}

#[test]
fn test_fleet_larger_than_base_configurations() {
    // the only configuration starts outside the base
    let graph = ZoneGraph::grid(3, 1);
    let bases = BaseSet::from_indices(3, &[0]);
    let configs = vec![Configuration::new(vec![2, 2])];

    let outcome = solve(&BaseFormulation::new(), &graph, &configs, 1, Some(&bases));

    assert_eq!(outcome.status, SolveStatus::Infeasible);
}

#[test]
fn test_fairness_encodings_reach_the_same_gap() {
    let graph = ZoneGraph::grid(3, 2);
    let bases = BaseSet::from_indices(6, &[0, 4]);
    let configs = ConfigurationEnumerator::new(&graph, &bases)
        .enumerate_pooled(3)
        .expect("enumerates");

    let encodings = [FairnessEncoding::Pairwise, FairnessEncoding::Bounds];
    let base: Vec<_> = encodings
        .iter()
        .map(|&encoding| {
            let formulation = BaseFormulation::new().with_fairness(encoding);
            solve_and_verify(&formulation, &graph, &configs, 3, Some(&bases))
        })
        .collect();
    let frequency: Vec<_> = encodings
        .iter()
        .map(|&encoding| {
            let formulation = FrequencyFormulation::new(2).with_fairness(encoding);
            solve_and_verify(&formulation, &graph, &configs, 3, Some(&bases))
        })
        .collect();

    for runs in [&base, &frequency] {
        for (outcome, violations) in runs.iter() {
            assert_eq!(outcome.status, SolveStatus::Optimal);
            assert!(violations.is_empty(), "{violations:?}");
        }
        assert_eq!(objective(&runs[0].0), objective(&runs[1].0));
        assert!(runs[1].0.stats.num_constrs < runs[0].0.stats.num_constrs);
    }
    assert_eq!(objective(&base[0].0), 3.0);
}
