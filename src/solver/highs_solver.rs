// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our domain model to the HiGHS API

use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

use crate::domain::{
    model::Model,
    solver_service::{Result, SolutionQuality, SolveResult, SolverService, SolverStatistics},
    value_objects::ConstraintType,
    ModelError,
};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &Model) -> Result<SolveResult> {
        // Validate first
        self.validate(model)?;
        let objective = model.objective().ok_or(ModelError::MissingObjective)?;

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add columns first, then rows)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(model.num_columns());
        let mut costs = vec![0.0; model.num_columns()];
        for (var, coeff) in objective.expression.terms() {
            costs[var.column()] = coeff;
        }

        for (column, &obj_coeff) in model.columns().iter().zip(&costs) {
            let lower = column.lower_bound;
            let upper = column.upper_bound;

            let col = if column.is_integer() {
                pb.add_integer_column(obj_coeff, lower..=upper)
            } else {
                pb.add_column(obj_coeff, lower..=upper)
            };
            cols.push(col);
        }

        for constraint in model.constraints() {
            let terms: Vec<_> = constraint
                .expression
                .terms()
                .map(|(var, coeff)| (cols[var.column()], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if objective.is_maximize() {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut highs_model = pb.optimise(sense);
        let config = model.solver_config();
        highs_model.set_option("output_flag", config.verbose);
        if let Some(seconds) = config.time_limit {
            highs_model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            highs_model.set_option("mip_rel_gap", gap);
        }

        let solved = highs_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_model(model, solve_time);

        let result = match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = objective.evaluate(&variable_values);
                let quality = SolutionQuality::assess(model, &variable_values);

                SolveResult::optimal(actual_obj, variable_values)
                    .with_message(format!("Optimal solution found for '{}'", model.name()))
                    .with_quality(quality)
            }
            status => non_optimal_result(status),
        };

        Ok(result.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

fn non_optimal_result(status: HighsModelStatus) -> SolveResult {
    match status {
        HighsModelStatus::Infeasible => SolveResult::infeasible(),
        HighsModelStatus::Unbounded => SolveResult::unbounded(),
        // Presolve cannot tell the two apart; do not claim either.
        HighsModelStatus::UnboundedOrInfeasible => {
            SolveResult::error("HiGHS found the problem infeasible or unbounded")
        }
        status => SolveResult::error(format!("HiGHS solver returned status: {:?}", status)),
    }
}
