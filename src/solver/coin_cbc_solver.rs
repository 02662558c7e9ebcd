// COIN-OR CBC Solver Adapter
// Implements the SolverService interface for CBC through good_lp

use good_lp::{solvers::coin_cbc::coin_cbc, SolverModel};
use std::time::Instant;

use crate::domain::{
    model::Model,
    solver_service::{Result, SolveResult, SolverService},
};
use crate::solver::good_lp_model;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &Model) -> Result<SolveResult> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let (mut lp_model, columns) = good_lp_model::translate(model)?.using(coin_cbc);

        let config = model.solver_config();
        if !config.verbose {
            lp_model.set_parameter("loglevel", "0");
        }
        if let Some(seconds) = config.time_limit {
            lp_model.set_parameter("seconds", &seconds.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        let outcome = lp_model.solve();

        Ok(good_lp_model::into_solve_result(
            model, outcome, &columns, start_time,
        ))
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
