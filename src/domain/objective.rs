use super::expression::LinearExpr;
use super::value_objects::OptimizationType;

/// Objective function to minimize or maximize
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub expression: LinearExpr,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, expression: LinearExpr) -> Self {
        Self {
            optimization_type,
            expression,
        }
    }

    pub fn is_maximize(&self) -> bool {
        self.optimization_type == OptimizationType::Maximize
    }

    /// Objective value (constant term included) for the given column values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.expression.evaluate(values)
    }

    pub fn num_terms(&self) -> usize {
        self.expression.num_terms()
    }
}

impl std::fmt::Display for ObjectiveFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} over {} terms",
            self.optimization_type,
            self.expression.num_terms()
        )
    }
}
