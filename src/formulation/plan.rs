//! Solved deployment plans and their verification.

use serde::Serialize;

use super::builder::{ModelHandles, ModelVar};
use super::FormulationInput;
use crate::models::Configuration;
use crate::solver::Assignment;

/// Vehicles moved from one zone to an adjacent one between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Origin zone index.
    pub from: usize,
    /// Destination zone index.
    pub to: usize,
    /// Departure period.
    pub period: usize,
    /// Number of vehicles moved.
    pub vehicles: u32,
}

/// A way in which a plan disagrees with its model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanViolation {
    /// Multiplicities do not add up to the fleet size.
    FleetSize {
        /// Requested fleet size.
        expected: u32,
        /// Sum of multiplicities.
        actual: u32,
    },
    /// A configuration outside the bases is in use.
    OutsideBase {
        /// Configuration index.
        config: usize,
    },
    /// Reported coverage differs from the coverage implied by the
    /// multiplicities.
    CoverageMismatch {
        /// Zone index.
        zone: usize,
        /// Coverage read from the solution.
        reported: u32,
        /// Coverage recomputed from the configurations.
        recomputed: u32,
    },
    /// The fairness gap is smaller than the actual coverage spread.
    FairnessGap {
        /// Gap read from the solution.
        reported: u32,
        /// `max − min` of the recomputed coverage.
        spread: u32,
    },
    /// A configuration does not have exactly one active frequency level.
    OneHot {
        /// Configuration index.
        config: usize,
        /// Number of active indicators.
        active: usize,
    },
    /// The active frequency level does not match the frequency.
    FrequencyLink {
        /// Configuration index.
        config: usize,
        /// Frequency read from the solution.
        frequency: u32,
        /// Level of the active indicator.
        level: usize,
    },
    /// Occupancy differs from the vehicles the configurations place there.
    Occupancy {
        /// Zone index.
        zone: usize,
        /// Period index.
        period: usize,
        /// Occupancy read from the solution.
        reported: u32,
        /// Occupancy implied by the multiplicities.
        implied: u32,
    },
    /// Occupancy at `period + 1` is not explained by arrivals and
    /// departures.
    FlowConservation {
        /// Zone index.
        zone: usize,
        /// Departure period.
        period: usize,
    },
}

/// A deployment read back from a solved model.
///
/// Values are rounded to the nearest non-negative integer. Occupancy and
/// movements are empty unless the model carried them; movements list only
/// the non-zero moves between distinct zones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPlan {
    multiplicity: Vec<u32>,
    coverage: Vec<u32>,
    fairness_gap: u32,
    #[serde(skip)]
    indicators: Vec<Vec<u32>>,
    occupancy: Vec<Vec<u32>>,
    movements: Vec<Movement>,
}

impl DeploymentPlan {
    /// Reads the plan out of a solved assignment.
    pub fn from_assignment(handles: &ModelHandles, assignment: &Assignment) -> Self {
        let read = |vars: &[ModelVar]| -> Vec<u32> {
            vars.iter().map(|&v| assignment.integer(v)).collect()
        };
        let movements = handles
            .movements
            .iter()
            .filter(|m| m.from != m.to)
            .filter_map(|m| {
                let vehicles = assignment.integer(m.var);
                (vehicles > 0).then_some(Movement {
                    from: m.from,
                    to: m.to,
                    period: m.period,
                    vehicles,
                })
            })
            .collect();

        Self {
            multiplicity: read(&handles.multiplicity),
            coverage: read(&handles.coverage),
            fairness_gap: assignment.integer(handles.fairness_gap),
            indicators: handles.indicators.iter().map(|levels| read(levels)).collect(),
            occupancy: handles.occupancy.iter().map(|periods| read(periods)).collect(),
            movements,
        }
    }

    /// Per configuration: how many vehicles follow it.
    pub fn multiplicity(&self) -> &[u32] {
        &self.multiplicity
    }

    /// Configurations in use with their multiplicity.
    pub fn selected(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.multiplicity
            .iter()
            .enumerate()
            .filter(|(_, &m)| m > 0)
            .map(|(c, &m)| (c, m))
    }

    /// Vehicles deployed.
    pub fn num_vehicles(&self) -> u32 {
        self.multiplicity.iter().sum()
    }

    /// Per zone: cumulative coverage.
    pub fn coverage(&self) -> &[u32] {
        &self.coverage
    }

    /// Minimised coverage spread.
    pub fn fairness_gap(&self) -> u32 {
        self.fairness_gap
    }

    /// Per zone, per period: vehicles standing there.
    pub fn occupancy(&self) -> &[Vec<u32>] {
        &self.occupancy
    }

    /// Non-zero moves between distinct zones.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Occupancy implied by the multiplicities: for every zone and period,
    /// the vehicles whose configuration stands there.
    pub fn implied_occupancy(
        &self,
        configurations: &[Configuration],
        num_zones: usize,
    ) -> Vec<Vec<u32>> {
        let horizon = configurations.first().map_or(0, Configuration::horizon);
        let mut grid = vec![vec![0u32; horizon]; num_zones];
        for (config, &m) in configurations.iter().zip(&self.multiplicity) {
            for (t, &zone) in config.positions().iter().enumerate() {
                grid[zone][t] += m;
            }
        }
        grid
    }

    /// Checks the plan against the model it was solved from.
    ///
    /// An empty result means the plan satisfies fleet size, the base
    /// restriction, the coverage definition and the fairness bound, plus
    /// the one-hot encoding and occupancy/flow constraints when the model
    /// carried them.
    pub fn verify(&self, input: &FormulationInput<'_>) -> Vec<PlanViolation> {
        let mut violations = Vec::new();
        let configurations = input.configurations();

        let actual = self.num_vehicles();
        if actual != input.num_vehicles() {
            violations.push(PlanViolation::FleetSize {
                expected: input.num_vehicles(),
                actual,
            });
        }

        if let Some(bases) = input.bases() {
            for (config, _) in self.selected() {
                if !configurations[config].starts_at_base(bases) {
                    violations.push(PlanViolation::OutsideBase { config });
                }
            }
        }

        let expected = input.coverage().zone_coverage(&self.multiplicity);
        for (zone, (&reported, &recomputed)) in self.coverage.iter().zip(&expected).enumerate() {
            if reported != recomputed {
                violations.push(PlanViolation::CoverageMismatch {
                    zone,
                    reported,
                    recomputed,
                });
            }
        }
        let spread = input.coverage().fairness_gap(&self.multiplicity);
        if self.fairness_gap < spread {
            violations.push(PlanViolation::FairnessGap {
                reported: self.fairness_gap,
                spread,
            });
        }

        for (config, levels) in self.indicators.iter().enumerate() {
            let active: Vec<usize> = levels
                .iter()
                .enumerate()
                .filter(|(_, &v)| v > 0)
                .map(|(k, _)| k)
                .collect();
            if active.len() != 1 {
                violations.push(PlanViolation::OneHot {
                    config,
                    active: active.len(),
                });
            } else if active[0] as u32 != self.multiplicity[config] {
                violations.push(PlanViolation::FrequencyLink {
                    config,
                    frequency: self.multiplicity[config],
                    level: active[0],
                });
            }
        }

        if !self.occupancy.is_empty() {
            self.verify_occupancy(input, &mut violations);
        }
        violations
    }

    fn verify_occupancy(&self, input: &FormulationInput<'_>, violations: &mut Vec<PlanViolation>) {
        let implied = self.implied_occupancy(input.configurations(), input.graph().num_zones());
        for (zone, periods) in self.occupancy.iter().enumerate() {
            for (period, &reported) in periods.iter().enumerate() {
                let expected = implied[zone][period];
                if reported != expected {
                    violations.push(PlanViolation::Occupancy {
                        zone,
                        period,
                        reported,
                        implied: expected,
                    });
                }
            }
        }

        // stays cancel out of the balance, so only cross-zone moves matter
        for period in 0..input.horizon().saturating_sub(1) {
            let mut balance: Vec<i64> = self
                .occupancy
                .iter()
                .map(|periods| i64::from(periods[period]) - i64::from(periods[period + 1]))
                .collect();
            for m in self.movements.iter().filter(|m| m.period == period) {
                balance[m.from] -= i64::from(m.vehicles);
                balance[m.to] += i64::from(m.vehicles);
            }
            for (zone, _) in balance.iter().enumerate().filter(|(_, &b)| b != 0) {
                violations.push(PlanViolation::FlowConservation { zone, period });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageMatrix;
    use crate::formulation::{
        BaseFormulation, ConsistencyFormulation, DecisionModel, Formulation,
    };
    use crate::models::{BaseSet, ZoneGraph};

    fn assignment_for(model: &DecisionModel, set: &[(usize, f64)]) -> Assignment {
        let mut values = vec![0.0; model.stats().num_vars];
        for &(id, value) in set {
            values[id] = value;
        }
        Assignment::new(values)
    }

    #[test]
    fn test_plan_verify_base() {
        // 0 - 1 - 2
        let graph = ZoneGraph::grid(3, 1);
        let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let bases = BaseSet::from_indices(3, &[0]);
        let input = FormulationInput::new(&graph, &configs, &coverage, 1)
            .expect("valid")
            .with_bases(&bases)
            .expect("same graph");
        let model = BaseFormulation::new().build(&input).expect("builds");
        let h = model.handles();

        let good = assignment_for(
            &model,
            &[
                (h.multiplicity[1].id(), 1.0),
                (h.coverage[0].id(), 2.0),
                (h.coverage[1].id(), 2.0),
                (h.coverage[2].id(), 1.0),
                (h.fairness_gap.id(), 1.0),
            ],
        );
        let plan = DeploymentPlan::from_assignment(h, &good);
        assert!(plan.verify(&input).is_empty());
        assert_eq!(plan.selected().collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(plan.num_vehicles(), 1);

        let bad = assignment_for(
            &model,
            &[
                (h.multiplicity[0].id(), 1.0),
                (h.multiplicity[1].id(), 1.0),
                (h.coverage[0].id(), 2.0),
                (h.coverage[1].id(), 2.0),
                (h.coverage[2].id(), 1.0),
            ],
        );
        let violations = DeploymentPlan::from_assignment(h, &bad).verify(&input);
        assert!(violations.contains(&PlanViolation::FleetSize {
            expected: 1,
            actual: 2
        }));
        assert!(violations
            .iter()
            .any(|v| matches!(v, PlanViolation::CoverageMismatch { zone: 0, .. })));
        assert!(violations
            .iter()
            .any(|v| matches!(v, PlanViolation::FairnessGap { reported: 0, .. })));
    }

    #[test]
    fn test_plan_verify_consistency_flow() {
        // 0 - 1
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let input = FormulationInput::new(&graph, &configs, &coverage, 1).expect("valid");
        let model = ConsistencyFormulation::new(1, 1).build(&input).expect("builds");
        let h = model.handles();
        let step = h
            .movements
            .iter()
            .find(|m| m.from == 0 && m.to == 1 && m.period == 0)
            .expect("adjacent move exists");

        let mut values = vec![
            (h.indicators[0][0].id(), 1.0),
            (h.indicators[1][1].id(), 1.0),
            (h.multiplicity[1].id(), 1.0),
            (h.occupancy[0][0].id(), 1.0),
            (h.occupancy[1][1].id(), 1.0),
            (h.coverage[0].id(), 2.0),
            (h.coverage[1].id(), 2.0),
        ];
        let without_move = assignment_for(&model, &values);
        values.push((step.var.id(), 1.0));
        let with_move = assignment_for(&model, &values);

        let plan = DeploymentPlan::from_assignment(h, &with_move);
        assert!(plan.verify(&input).is_empty());
        assert_eq!(plan.movements().len(), 1);
        assert_eq!(plan.occupancy(), &[vec![1, 0], vec![0, 1]]);
        assert_eq!(
            plan.implied_occupancy(&configs, 2),
            vec![vec![1, 0], vec![0, 1]]
        );

        let violations = DeploymentPlan::from_assignment(h, &without_move).verify(&input);
        assert_eq!(
            violations,
            vec![
                PlanViolation::FlowConservation { zone: 0, period: 0 },
                PlanViolation::FlowConservation { zone: 1, period: 0 },
            ]
        );
    }

    #[test]
    fn test_plan_verify_one_hot() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0])];
        let coverage = CoverageMatrix::build(&graph, &configs, 1).expect("valid");
        let input = FormulationInput::new(&graph, &configs, &coverage, 1).expect("valid");
        let model = crate::formulation::FrequencyFormulation::new(2)
            .build(&input)
            .expect("builds");
        let h = model.handles();
        let assignment = assignment_for(
            &model,
            &[
                (h.indicators[0][2].id(), 1.0),
                (h.multiplicity[0].id(), 1.0),
                (h.coverage[0].id(), 1.0),
                (h.coverage[1].id(), 1.0),
            ],
        );
        let violations = DeploymentPlan::from_assignment(h, &assignment).verify(&input);
        assert_eq!(
            violations,
            vec![PlanViolation::FrequencyLink {
                config: 0,
                frequency: 1,
                level: 2
            }]
        );
    }
}
