//! Frequency-bounded selection with explicit occupancy and flow conservation.

use good_lp::{constraint, Expression};

use super::builder::{
    add_coverage, add_fairness, add_fleet_size, add_one_hot_frequencies, DecisionModel,
    FairnessEncoding, ModelBuilder, ModelHandles, ModelVar, MovementVar,
};
use super::{Formulation, FormulationInput};
use crate::error::Result;

/// Default frequency bound of the consistency model.
pub const DEFAULT_CONSISTENCY_MAX_FREQUENCY: u32 = 3;

/// Default per-period movement budget.
pub const DEFAULT_MAX_MOVEMENT: u32 = 10;

/// Extends [`FrequencyFormulation`](super::FrequencyFormulation) with
/// per-zone occupancy and inter-zone movement so the selected fleet forms a
/// physically consistent plan.
///
/// Additional variables: `occupancy[i,t] ∈ ℤ≥0` for every zone and period,
/// `movement[i,j,t] ∈ ℤ≥0` for `t < T−1` and `j` equal or adjacent to `i`.
/// Movements between non-adjacent zones have no variable at all, which
/// fixes them to zero.
///
/// Constraints:
/// - non-base zones start empty (when bases are given)
/// - one-hot frequency encoding and fleet size
/// - `occupancy[i,t] = Σ frequency[c]` over configurations at `i` in period `t`
/// - `occupancy[i,t] + arrivals − departures = occupancy[i,t+1]`
/// - `Σ_{i≠j} movement[i,j,t] ≤ max_movement` per period
/// - coverage and fairness as in the frequency model
///
/// Coverage is still derived from configuration membership. Because
/// occupancy is pinned to the same frequencies and adjacency is symmetric,
/// it equals the occupancy-based count `Σ_t Σ_{j ∈ N[i]} occupancy[j,t]`.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{BaseSet, Configuration, ZoneGraph};
/// use u_deploy::coverage::CoverageMatrix;
/// use u_deploy::formulation::{ConsistencyFormulation, Formulation, FormulationInput};
///
/// // 0 - 1, base at 0
/// let graph = ZoneGraph::grid(2, 1);
/// let bases = BaseSet::from_indices(2, &[0]);
/// let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];
/// let coverage = CoverageMatrix::build(&graph, &configs, 2).unwrap();
/// let input = FormulationInput::new(&graph, &configs, &coverage, 1)
///     .unwrap()
///     .with_bases(&bases)
///     .unwrap();
///
/// let model = ConsistencyFormulation::new(1, 0).build(&input).unwrap();
/// // 2 zones × 2 periods of occupancy, moves 0→0, 0→1, 1→1, 1→0 for t = 0
/// assert_eq!(model.handles().occupancy.len(), 2);
/// assert_eq!(model.handles().movements.len(), 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyFormulation {
    max_frequency: u32,
    max_movement: u32,
    fairness: FairnessEncoding,
}

impl ConsistencyFormulation {
    /// Creates the formulation with a frequency bound and a per-period
    /// movement budget.
    pub fn new(max_frequency: u32, max_movement: u32) -> Self {
        Self {
            max_frequency,
            max_movement,
            fairness: FairnessEncoding::default(),
        }
    }

    /// Sets the fairness encoding.
    pub fn with_fairness(mut self, fairness: FairnessEncoding) -> Self {
        self.fairness = fairness;
        self
    }

    /// Frequency bound.
    pub fn max_frequency(&self) -> u32 {
        self.max_frequency
    }

    /// Movement budget per period.
    pub fn max_movement(&self) -> u32 {
        self.max_movement
    }
}

impl Default for ConsistencyFormulation {
    fn default() -> Self {
        Self::new(DEFAULT_CONSISTENCY_MAX_FREQUENCY, DEFAULT_MAX_MOVEMENT)
    }
}

impl Formulation for ConsistencyFormulation {
    fn name(&self) -> &'static str {
        "consistency"
    }

    fn build(&self, input: &FormulationInput<'_>) -> Result<DecisionModel> {
        let graph = input.graph();
        let configurations = input.configurations();
        let num_zones = graph.num_zones();
        let horizon = input.horizon();
        let mut builder = ModelBuilder::new();

        let (indicators, frequency) =
            add_one_hot_frequencies(&mut builder, configurations.len(), self.max_frequency);

        let occupancy: Vec<Vec<ModelVar>> = (0..num_zones)
            .map(|_| {
                (0..horizon)
                    .map(|_| builder.add_integer("occupancy", None))
                    .collect()
            })
            .collect();

        // outgoing[t][i]: (destination, variable) in footprint order
        let mut movements = Vec::new();
        let mut outgoing: Vec<Vec<Vec<(usize, ModelVar)>>> =
            Vec::with_capacity(horizon.saturating_sub(1));
        for period in 0..horizon.saturating_sub(1) {
            let mut by_zone = Vec::with_capacity(num_zones);
            for from in 0..num_zones {
                let moves: Vec<(usize, ModelVar)> = graph
                    .footprint(from)
                    .map(|to| {
                        let var = builder.add_integer("movement", None);
                        movements.push(MovementVar { from, to, period, var });
                        (to, var)
                    })
                    .collect();
                by_zone.push(moves);
            }
            outgoing.push(by_zone);
        }

        if let Some(bases) = input.bases() {
            for (zone, periods) in occupancy.iter().enumerate() {
                if !bases.contains(zone) {
                    builder.add_constraint(
                        "initial_occupancy",
                        constraint!(periods[0].var() == 0.0),
                    );
                }
            }
        }

        add_fleet_size(&mut builder, &frequency, input.num_vehicles());

        // configurations standing on each zone, per period
        let mut present: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); horizon]; num_zones];
        for (c, config) in configurations.iter().enumerate() {
            for (t, &zone) in config.positions().iter().enumerate() {
                present[zone][t].push(c);
            }
        }
        for (zone, periods) in occupancy.iter().enumerate() {
            for (t, occupied) in periods.iter().enumerate() {
                let total: Expression =
                    present[zone][t].iter().map(|&c| frequency[c].var()).sum();
                builder.add_constraint("occupancy", constraint!(occupied.var() == total));
            }
        }

        for (period, by_zone) in outgoing.iter().enumerate() {
            for zone in 0..num_zones {
                let mut balance = Expression::from(occupancy[zone][period].var());
                for from in graph.footprint(zone) {
                    if let Some(&(_, arriving)) = by_zone[from].iter().find(|(to, _)| *to == zone)
                    {
                        balance += arriving.var();
                    }
                }
                for &(_, leaving) in &by_zone[zone] {
                    balance -= leaving.var();
                }
                builder.add_constraint(
                    "flow_conservation",
                    constraint!(balance == occupancy[zone][period + 1].var()),
                );
            }

            let moved: Vec<ModelVar> = by_zone
                .iter()
                .enumerate()
                .flat_map(|(from, moves)| {
                    moves
                        .iter()
                        .filter(move |(to, _)| *to != from)
                        .map(|&(_, var)| var)
                })
                .collect();
            if !moved.is_empty() {
                let total: Expression = moved.iter().map(|v| v.var()).sum();
                builder.add_constraint(
                    "movement_budget",
                    constraint!(total <= f64::from(self.max_movement)),
                );
            }
        }

        let coverage = add_coverage(&mut builder, input.coverage(), &frequency);
        let fairness_gap = add_fairness(&mut builder, &coverage, self.fairness);

        let handles = ModelHandles {
            multiplicity: frequency,
            indicators,
            occupancy,
            movements,
            coverage,
            fairness_gap,
        };
        Ok(builder.finish(self.name(), handles))
    }
}
