// Domain layer: the modeling engine (sets, parameters, variables, constraints, objective)
pub mod domain;

// Application layer: Use cases and service orchestration
pub mod application;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Models built on the engine
pub mod scenarios;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ExtractedSolution, IndexKey, IndexSet, Key, LinearExpr, Model,
    ModelError, ModelId, ObjectiveFunction, OptimizationType, Parameter, Relation, ResultExtractor,
    SolutionStatus, SolveResult, SolverBackend, SolverConfig, SolverError, SolverService,
    VarRef, Variable, VariableDomain,
};

pub use application::{PipelineOutcome, SolvePipeline};

pub use solver::{MicroLpSolver, SolverFactory};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
