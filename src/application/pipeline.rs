// Use case: solve a model and map the result back onto its named entities

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    model::Model,
    result::{ExtractedSolution, ResultExtractor},
    solver_service::{Result, SolveResult, SolverService},
    value_objects::SolutionStatus,
};
use crate::solver::SolverFactory;

/// Result of running a model through the pipeline.
///
/// `solution` is present only when the solve was optimal.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub solver: String,
    pub result: SolveResult,
    pub solution: Option<ExtractedSolution>,
}

impl PipelineOutcome {
    pub fn status(&self) -> SolutionStatus {
        self.result.status
    }
}

/// Solve-and-extract pipeline
pub struct SolvePipeline {
    solver: Option<Arc<dyn SolverService>>,
}

impl SolvePipeline {
    /// Pick the backend from each model's solver configuration.
    pub fn new() -> Self {
        Self { solver: None }
    }

    /// Always use `solver`, whatever the model's configuration says.
    pub fn with_solver(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver: Some(solver),
        }
    }

    pub fn run(&self, model: &Model) -> Result<PipelineOutcome> {
        let solver = match &self.solver {
            Some(solver) => Arc::clone(solver),
            None => SolverFactory::create_solver(model)?,
        };

        info!(
            component = "pipeline",
            model = model.name(),
            solver = solver.name(),
            columns = model.num_columns(),
            integer_columns = model.num_integer_columns(),
            constraints = model.constraints().len(),
            "Solving model"
        );

        let result = solver.solve(model)?;

        let solution = if result.is_optimal() {
            Some(ResultExtractor::extract(model, &result)?)
        } else {
            warn!(
                component = "pipeline",
                model = model.name(),
                status = %result.status,
                message = %result.message,
                "Model has no optimal solution"
            );
            None
        };

        info!(
            component = "pipeline",
            model = model.name(),
            status = %result.status,
            objective = ?result.objective_value,
            solve_time_ms = result.statistics.solve_time_ms,
            max_violation = result.quality.max_constraint_violation,
            "Solve finished"
        );

        Ok(PipelineOutcome {
            solver: solver.name().to_string(),
            result,
            solution,
        })
    }
}

impl Default for SolvePipeline {
    fn default() -> Self {
        Self::new()
    }
}
