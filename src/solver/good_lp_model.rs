// Translation shared by the good_lp based adapters (MicroLP and COIN-OR CBC)

use good_lp::{
    variable, Constraint as LpConstraint, Expression, ProblemVariables, ResolutionError,
    Solution as GoodLpSolutionTrait, Solver, SolverModel, Variable as LpVariable,
};
use std::time::Instant;

use crate::domain::{
    model::Model,
    solver_service::{Result, SolutionQuality, SolveResult, SolverStatistics},
    value_objects::ConstraintType,
};

/// A model rewritten in good_lp terms; `columns[i]` is model column `i`.
pub(crate) struct GoodLpProblem {
    vars: ProblemVariables,
    objective: Expression,
    maximize: bool,
    pub columns: Vec<LpVariable>,
    constraints: Vec<LpConstraint>,
}

impl GoodLpProblem {
    /// Hand the problem to a good_lp solver, constraints included.
    pub fn using<S: Solver>(self, solver: S) -> (S::Model, Vec<LpVariable>) {
        let unsolved = if self.maximize {
            self.vars.maximise(self.objective)
        } else {
            self.vars.minimise(self.objective)
        };
        let lp_model = self
            .constraints
            .into_iter()
            .fold(unsolved.using(solver), |lp_model, constraint| {
                lp_model.with(constraint)
            });
        (lp_model, self.columns)
    }
}

pub(crate) fn translate(model: &Model) -> Result<GoodLpProblem> {
    model.validate()?;
    let objective = model
        .objective()
        .ok_or(crate::domain::ModelError::MissingObjective)?;

    // Build variables using good_lp
    let mut vars = ProblemVariables::new();
    let mut columns = Vec::with_capacity(model.num_columns());
    for column in model.columns() {
        let definition = variable()
            .name(column.name.clone())
            .min(column.lower_bound)
            .max(column.upper_bound);
        let definition = if column.is_integer() {
            definition.integer()
        } else {
            definition
        };
        columns.push(vars.add(definition));
    }

    // Objective constant is added back when the value is computed
    let mut obj_expr: Expression = 0.into();
    for (var, coeff) in objective.expression.terms() {
        obj_expr += coeff * columns[var.column()];
    }

    let constraints = model
        .constraints()
        .iter()
        .map(|constraint| {
            let mut lhs: Expression = 0.into();
            for (var, coeff) in constraint.expression.terms() {
                lhs += coeff * columns[var.column()];
            }
            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lhs.leq(constraint.bound),
                ConstraintType::Equal => lhs.eq(constraint.bound),
                ConstraintType::GreaterThanOrEqual => lhs.geq(constraint.bound),
            }
        })
        .collect();

    Ok(GoodLpProblem {
        vars,
        objective: obj_expr,
        maximize: objective.is_maximize(),
        columns,
        constraints,
    })
}

/// Turn a good_lp outcome into a [`SolveResult`]; failures become data, not errors.
pub(crate) fn into_solve_result<S: GoodLpSolutionTrait>(
    model: &Model,
    outcome: std::result::Result<S, ResolutionError>,
    columns: &[LpVariable],
    start_time: Instant,
) -> SolveResult {
    let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
    let statistics = SolverStatistics::for_model(model, solve_time);

    match outcome {
        Ok(sol) => {
            let variable_values: Vec<f64> = columns.iter().map(|&var| sol.value(var)).collect();
            let actual_obj = model
                .objective()
                .map(|objective| objective.evaluate(&variable_values))
                .unwrap_or(0.0);
            let quality = SolutionQuality::assess(model, &variable_values);

            SolveResult::optimal(actual_obj, variable_values)
                .with_message(format!("Optimal solution found for '{}'", model.name()))
                .with_statistics(statistics)
                .with_quality(quality)
        }
        Err(ResolutionError::Infeasible) => SolveResult::infeasible().with_statistics(statistics),
        Err(ResolutionError::Unbounded) => SolveResult::unbounded().with_statistics(statistics),
        Err(e) => SolveResult::error(format!("Solver execution failed: {}", e)).with_statistics(statistics),
    }
}
