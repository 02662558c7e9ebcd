// MicroLP Solver Adapter
// Pure-Rust backend through good_lp; always compiled in

use good_lp::{solvers::microlp::microlp, SolverModel};
use std::time::Instant;
use tracing::warn;

use crate::domain::{
    model::Model,
    solver_service::{Result, SolveResult, SolverService},
};
use crate::solver::good_lp_model;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, model: &Model) -> Result<SolveResult> {
        // Validate first
        self.validate(model)?;

        let config = model.solver_config();
        if config.time_limit.is_some() || config.gap_tolerance.is_some() {
            warn!(
                component = "solver",
                backend = self.name(),
                "Time limit and gap tolerance are not supported; solving to optimality"
            );
        }

        let start_time = Instant::now();
        let (lp_model, columns) = good_lp_model::translate(model)?.using(microlp);
        let outcome = lp_model.solve();

        Ok(good_lp_model::into_solve_result(
            model, outcome, &columns, start_time,
        ))
    }

    fn name(&self) -> &str {
        "MicroLP"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
