// Domain value objects shared by the modeling engine and the solver adapters

use std::convert::Infallible;
use std::fmt;

/// Numeric class a decision variable must satisfy.
///
/// The domain also fixes the implicit bounds of every instance of the variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableDomain {
    /// x ∈ ℤ, x ≥ 0
    NonNegativeIntegers,
    /// x ∈ ℝ, x ≥ 0
    NonNegativeReals,
    /// x ∈ ℤ
    Integers,
    /// x ∈ ℝ
    Reals,
    /// x ∈ {0, 1}
    Binary,
}

impl VariableDomain {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            VariableDomain::NonNegativeIntegers | VariableDomain::Integers | VariableDomain::Binary
        )
    }

    pub fn lower_bound(&self) -> f64 {
        match self {
            VariableDomain::NonNegativeIntegers
            | VariableDomain::NonNegativeReals
            | VariableDomain::Binary => 0.0,
            VariableDomain::Integers | VariableDomain::Reals => f64::NEG_INFINITY,
        }
    }

    pub fn upper_bound(&self) -> f64 {
        match self {
            VariableDomain::Binary => 1.0,
            _ => f64::INFINITY,
        }
    }
}

impl fmt::Display for VariableDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableDomain::NonNegativeIntegers => write!(f, "NonNegativeIntegers"),
            VariableDomain::NonNegativeReals => write!(f, "NonNegativeReals"),
            VariableDomain::Integers => write!(f, "Integers"),
            VariableDomain::Reals => write!(f, "Reals"),
            VariableDomain::Binary => write!(f, "Binary"),
        }
    }
}

/// A domain name that matches none of the recognized [`VariableDomain`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized variable domain '{0}'")]
pub struct UnrecognizedDomain(pub String);

impl From<Infallible> for UnrecognizedDomain {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl TryFrom<&str> for VariableDomain {
    type Error = UnrecognizedDomain;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name {
            "NonNegativeIntegers" => Ok(VariableDomain::NonNegativeIntegers),
            "NonNegativeReals" => Ok(VariableDomain::NonNegativeReals),
            "Integers" => Ok(VariableDomain::Integers),
            "Reals" => Ok(VariableDomain::Reals),
            "Binary" | "Boolean" => Ok(VariableDomain::Binary),
            other => Err(UnrecognizedDomain(other.to_string())),
        }
    }
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl ConstraintType {
    /// Amount by which `activity` misses `bound` under this comparison (0 when satisfied).
    pub fn violation(&self, activity: f64, bound: f64) -> f64 {
        match self {
            ConstraintType::LessThanOrEqual => (activity - bound).max(0.0),
            ConstraintType::Equal => (activity - bound).abs(),
            ConstraintType::GreaterThanOrEqual => (bound - activity).max(0.0),
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanOrEqual => write!(f, "<="),
            ConstraintType::Equal => write!(f, "=="),
            ConstraintType::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

impl fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationType::Minimize => write!(f, "minimize"),
            OptimizationType::Maximize => write!(f, "maximize"),
        }
    }
}

/// Outcome classification of a solve attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Solver error occurred
    Error,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Automatically select best available solver
    Auto,
    /// Pure-Rust MicroLP solver (always compiled in)
    MicroLp,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "MicroLP"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
