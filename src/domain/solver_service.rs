// Domain service interface for solving models
// Defines the contract that any solver backend must follow (Dependency Inversion Principle)

use super::error::ModelError;
use super::model::Model;
use super::value_objects::SolutionStatus;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Solution values are only available for optimal results (status: {status})")]
    NotOptimal { status: SolutionStatus },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_model(model: &Model, solve_time_ms: f64) -> Self {
        let columns = model.columns();
        Self {
            solve_time_ms,
            num_variables: columns.len() as u32,
            num_constraints: model.constraints().len() as u32,
            num_integer_vars: columns.iter().filter(|c| c.is_integer()).count() as u32,
            num_binary_vars: columns
                .iter()
                .filter(|c| c.domain == super::value_objects::VariableDomain::Binary)
                .count() as u32,
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    /// Measure how far `values` stray from the model's constraints and integrality.
    pub fn assess(model: &Model, values: &[f64]) -> Self {
        let max_constraint_violation = model
            .constraints()
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max);
        let max_integrality_violation = model
            .columns()
            .iter()
            .zip(values)
            .filter(|(column, _)| column.is_integer())
            .map(|(_, value)| (value - value.round()).abs())
            .fold(0.0, f64::max);

        Self {
            max_constraint_violation,
            max_integrality_violation,
        }
    }
}

/// Outcome of one solve attempt.
///
/// `variable_values` is indexed by column and is only meaningful when
/// `status` is [`SolutionStatus::Optimal`]; `objective_value` is present iff so.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl SolveResult {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn infeasible() -> Self {
        Self::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
    }

    pub fn unbounded() -> Self {
        Self::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(SolutionStatus::Error, message)
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Domain service interface for optimization solvers
///
/// This trait defines the contract that all solver backends must follow.
/// It allows us to swap solver backends without changing the modeling code (Open/Closed Principle).
pub trait SolverService: Send + Sync {
    /// Solve a model.
    ///
    /// Infeasible, unbounded and failed solves come back as a [`SolveResult`]
    /// status; `Err` is reserved for models the backend refuses to run.
    fn solve(&self, model: &Model) -> Result<SolveResult>;

    /// Validate a model without solving it
    fn validate(&self, model: &Model) -> Result<()> {
        model.validate()?;

        let mut errors = Vec::new();

        if model.is_mixed_integer() && !self.supports_mip() {
            errors.push(format!(
                "{} integer columns but {} only solves continuous problems",
                model.num_integer_columns(),
                self.name()
            ));
        }

        // Check constraint bounds are usable
        for constraint in model.constraints() {
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint '{}' has non-finite bound {}",
                    constraint.name, constraint.bound
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
