// Domain module: the solver-neutral modeling engine

pub mod constraint;
pub mod error;
pub mod expression;
pub mod index_set;
pub mod key;
pub mod model;
pub mod objective;
pub mod parameter;
pub mod result;
pub mod solver_service;
pub mod value_objects;
pub mod variable;

pub use constraint::{Constraint, ConstraintFamily};
pub use error::{EntityKind, ModelError};
pub use expression::{LinearExpr, ModelId, Relation, VarRef};
pub use index_set::IndexSet;
pub use key::{IndexKey, Key};
pub use model::{Model, SolverConfig};
pub use objective::ObjectiveFunction;
pub use parameter::Parameter;
pub use result::{ExtractedSolution, ResultExtractor};
pub use solver_service::{
    SolutionQuality, SolveResult, SolverError, SolverService, SolverStatistics,
};
pub use value_objects::*;
pub use variable::{Column, Variable};
