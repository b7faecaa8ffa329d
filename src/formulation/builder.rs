//! Variable/constraint assembly shared by every formulation.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use serde::Serialize;
use tracing::debug;

use crate::coverage::CoverageMatrix;
use crate::models::{BaseSet, Configuration};

/// A decision variable registered with a [`ModelBuilder`].
///
/// `id` is the variable's column in the solved [`Assignment`](crate::solver::Assignment).
#[derive(Debug, Clone, Copy)]
pub struct ModelVar {
    id: usize,
    var: Variable,
}

impl ModelVar {
    /// Column index in the solved assignment.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Underlying solver variable.
    pub fn var(&self) -> Variable {
        self.var
    }
}

/// Variable and constraint counts of one named family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyCount {
    /// Family name (e.g. `selection`, `fairness`).
    pub name: &'static str,
    /// Variables registered under the name.
    pub variables: usize,
    /// Constraints registered under the name.
    pub constraints: usize,
}

/// Size of an assembled model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    /// Total variables.
    pub num_vars: usize,
    /// Total constraints.
    pub num_constrs: usize,
    /// Per-family breakdown, in registration order.
    pub families: Vec<FamilyCount>,
}

impl ModelStats {
    /// Counts of a family, if it was registered.
    pub fn family(&self, name: &str) -> Option<&FamilyCount> {
        self.families.iter().find(|f| f.name == name)
    }
}

/// A movement variable `movement[from, to, period]`.
#[derive(Debug, Clone, Copy)]
pub struct MovementVar {
    /// Origin zone index.
    pub from: usize,
    /// Destination zone index (equal to `from` or adjacent to it).
    pub to: usize,
    /// Period the move departs from; arrives at `period + 1`.
    pub period: usize,
    /// The variable.
    pub var: ModelVar,
}

/// Named handles into an assembled model, used to read results back.
#[derive(Debug, Clone)]
pub struct ModelHandles {
    /// Per configuration: binary selection or integer frequency.
    pub multiplicity: Vec<ModelVar>,
    /// Per configuration: one-hot indicators over `0..=max_frequency`.
    /// Empty for the base formulation.
    pub indicators: Vec<Vec<ModelVar>>,
    /// Per zone, per period: vehicles standing there. Empty unless the
    /// model carries occupancy.
    pub occupancy: Vec<Vec<ModelVar>>,
    /// Movement variables, only for equal or adjacent zone pairs.
    pub movements: Vec<MovementVar>,
    /// Per zone: cumulative coverage.
    pub coverage: Vec<ModelVar>,
    /// The minimised spread of coverage.
    pub fairness_gap: ModelVar,
}

/// A fully assembled model ready to hand to a solver: minimise `objective`
/// subject to `constraints`.
///
/// Built fresh for every run and consumed by the solve.
pub struct DecisionModel {
    pub(crate) name: &'static str,
    pub(crate) variables: ProblemVariables,
    pub(crate) columns: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: ModelVar,
    pub(crate) handles: ModelHandles,
    pub(crate) stats: ModelStats,
    pub(crate) infeasible: Option<String>,
}

impl DecisionModel {
    /// Name of the formulation that produced this model.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Model size.
    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    /// Handles for reading the solution.
    pub fn handles(&self) -> &ModelHandles {
        &self.handles
    }

    /// The minimised variable.
    pub fn objective(&self) -> ModelVar {
        self.objective
    }

    /// Reason the model is infeasible by construction, if detected while
    /// assembling (a constraint without variables that cannot hold).
    pub fn known_infeasibility(&self) -> Option<&str> {
        self.infeasible.as_deref()
    }
}

impl std::fmt::Debug for DecisionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionModel")
            .field("name", &self.name)
            .field("stats", &self.stats)
            .field("infeasible", &self.infeasible)
            .finish()
    }
}

/// Incrementally assembles variables and constraints for one model.
///
/// Every variable and constraint is registered under a family name so the
/// resulting [`ModelStats`] can break the model size down.
///
/// # Examples
///
/// ```
/// use good_lp::constraint;
/// use u_deploy::formulation::ModelBuilder;
///
/// let mut builder = ModelBuilder::new();
/// let x = builder.add_binary("selection");
/// let y = builder.add_integer("coverage", None);
/// builder.add_constraint("coverage", constraint!(y.var() == 2.0 * x.var()));
/// assert_eq!(builder.num_variables(), 2);
/// assert_eq!(builder.num_constraints(), 1);
/// ```
pub struct ModelBuilder {
    variables: ProblemVariables,
    columns: Vec<Variable>,
    constraints: Vec<Constraint>,
    families: Vec<FamilyCount>,
    infeasible: Option<String>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            variables: ProblemVariables::new(),
            columns: Vec::new(),
            constraints: Vec::new(),
            families: Vec::new(),
            infeasible: None,
        }
    }

    fn family_mut(&mut self, name: &'static str) -> &mut FamilyCount {
        let pos = match self.families.iter().position(|f| f.name == name) {
            Some(pos) => pos,
            None => {
                self.families.push(FamilyCount {
                    name,
                    variables: 0,
                    constraints: 0,
                });
                self.families.len() - 1
            }
        };
        &mut self.families[pos]
    }

    fn register(&mut self, family: &'static str, var: Variable) -> ModelVar {
        let id = self.columns.len();
        self.columns.push(var);
        self.family_mut(family).variables += 1;
        ModelVar { id, var }
    }

    /// Adds a binary variable.
    pub fn add_binary(&mut self, family: &'static str) -> ModelVar {
        let var = self.variables.add(variable().binary());
        self.register(family, var)
    }

    /// Adds a non-negative integer variable with an optional upper bound.
    pub fn add_integer(&mut self, family: &'static str, max: Option<u32>) -> ModelVar {
        let mut definition = variable().integer().min(0.0);
        if let Some(max) = max {
            definition = definition.max(f64::from(max));
        }
        let var = self.variables.add(definition);
        self.register(family, var)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, family: &'static str, constraint: Constraint) {
        self.constraints.push(constraint);
        self.family_mut(family).constraints += 1;
    }

    /// Records that the model cannot be satisfied, e.g. a required sum over
    /// an empty set of variables.
    pub fn mark_infeasible(&mut self, reason: impl Into<String>) {
        if self.infeasible.is_none() {
            self.infeasible = Some(reason.into());
        }
    }

    /// Variables registered so far.
    pub fn num_variables(&self) -> usize {
        self.columns.len()
    }

    /// Constraints registered so far.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Finalises the model: minimise `handles.fairness_gap`.
    pub fn finish(self, name: &'static str, handles: ModelHandles) -> DecisionModel {
        let stats = ModelStats {
            num_vars: self.columns.len(),
            num_constrs: self.constraints.len(),
            families: self.families,
        };
        debug!(
            formulation = name,
            variables = stats.num_vars,
            constraints = stats.num_constrs,
            "assembled decision model"
        );
        DecisionModel {
            name,
            variables: self.variables,
            columns: self.columns,
            constraints: self.constraints,
            objective: handles.fairness_gap,
            handles,
            stats,
            infeasible: self.infeasible,
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// How the fairness gap is tied to the coverage variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FairnessEncoding {
    /// `gap ≥ coverage[i] − coverage[j]` for every ordered pair `i ≠ j`.
    #[default]
    Pairwise,
    /// Two auxiliary integers bracket all coverages,
    /// `upper ≥ coverage[i] ≥ lower`, and `gap ≥ upper − lower`.
    Bounds,
}

/// Adds one binary selection variable per configuration.
pub fn add_selection(builder: &mut ModelBuilder, num_configs: usize) -> Vec<ModelVar> {
    (0..num_configs)
        .map(|_| builder.add_binary("selection"))
        .collect()
}

/// Adds the unary frequency encoding: `indicator[c][k]` binaries with
/// exactly one set per configuration, and `frequency[c] = Σ k·indicator[c][k]`.
///
/// Returns `(indicators, frequencies)`.
pub fn add_one_hot_frequencies(
    builder: &mut ModelBuilder,
    num_configs: usize,
    max_frequency: u32,
) -> (Vec<Vec<ModelVar>>, Vec<ModelVar>) {
    let indicators: Vec<Vec<ModelVar>> = (0..num_configs)
        .map(|_| {
            (0..=max_frequency)
                .map(|_| builder.add_binary("indicator"))
                .collect()
        })
        .collect();
    let frequencies: Vec<ModelVar> = (0..num_configs)
        .map(|_| builder.add_integer("frequency", None))
        .collect();

    for levels in &indicators {
        let total: Expression = levels.iter().map(|v| v.var()).sum();
        builder.add_constraint("one_hot", constraint!(total == 1.0));
    }
    for (levels, frequency) in indicators.iter().zip(&frequencies) {
        let mut level_sum = Expression::from(0.0);
        for (k, indicator) in levels.iter().enumerate() {
            level_sum += (k as f64) * indicator.var();
        }
        builder.add_constraint("frequency_link", constraint!(frequency.var() == level_sum));
    }
    (indicators, frequencies)
}

/// Requires the multiplicities to add up to the fleet size.
pub fn add_fleet_size(builder: &mut ModelBuilder, multiplicity: &[ModelVar], num_vehicles: u32) {
    if multiplicity.is_empty() {
        if num_vehicles > 0 {
            builder.mark_infeasible(format!(
                "{num_vehicles} vehicles but no configurations to deploy"
            ));
        }
        return;
    }
    let total: Expression = multiplicity.iter().map(|v| v.var()).sum();
    builder.add_constraint("fleet_size", constraint!(total == f64::from(num_vehicles)));
}

/// Forces the multiplicity of every configuration that does not start at
/// one of `bases` to zero, as a single aggregated constraint.
pub fn add_base_restriction(
    builder: &mut ModelBuilder,
    configurations: &[Configuration],
    bases: &BaseSet,
    multiplicity: &[ModelVar],
) {
    let outside: Vec<Variable> = configurations
        .iter()
        .zip(multiplicity)
        .filter(|(config, _)| !config.starts_at_base(bases))
        .map(|(_, v)| v.var())
        .collect();
    if outside.is_empty() {
        return;
    }
    let total: Expression = outside.into_iter().sum();
    builder.add_constraint("base_restriction", constraint!(total == 0.0));
}

/// Adds `coverage[i] = Σ_c Σ_t b[i,t,c]·multiplicity[c]` for every zone.
pub fn add_coverage(
    builder: &mut ModelBuilder,
    matrix: &CoverageMatrix,
    multiplicity: &[ModelVar],
) -> Vec<ModelVar> {
    let coverage: Vec<ModelVar> = (0..matrix.num_zones())
        .map(|_| builder.add_integer("coverage", None))
        .collect();
    for (zone, covered) in coverage.iter().enumerate() {
        let mut total = Expression::from(0.0);
        for &(config, periods) in matrix.column(zone) {
            total += f64::from(periods) * multiplicity[config].var();
        }
        builder.add_constraint("coverage", constraint!(covered.var() == total));
    }
    coverage
}

/// Adds the fairness gap variable and ties it to the coverage spread.
pub fn add_fairness(
    builder: &mut ModelBuilder,
    coverage: &[ModelVar],
    encoding: FairnessEncoding,
) -> ModelVar {
    let gap = builder.add_integer("fairness", None);
    match encoding {
        FairnessEncoding::Pairwise => {
            for (i, ci) in coverage.iter().enumerate() {
                for (j, cj) in coverage.iter().enumerate() {
                    if i != j {
                        builder.add_constraint(
                            "fairness",
                            constraint!(gap.var() >= ci.var() - cj.var()),
                        );
                    }
                }
            }
        }
        FairnessEncoding::Bounds => {
            let upper = builder.add_integer("fairness", None);
            let lower = builder.add_integer("fairness", None);
            for c in coverage {
                builder.add_constraint("fairness", constraint!(upper.var() >= c.var()));
                builder.add_constraint("fairness", constraint!(lower.var() <= c.var()));
            }
            builder.add_constraint(
                "fairness",
                constraint!(gap.var() >= upper.var() - lower.var()),
            );
        }
    }
    gap
}
