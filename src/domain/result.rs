// Maps solved column values back onto named variables and their keys

use indexmap::IndexMap;

use super::error::{EntityKind, ModelError};
use super::expression::LinearExpr;
use super::key::IndexKey;
use super::model::Model;
use super::solver_service::{Result, SolveResult, SolverError};

/// Integer columns closer than this to an integer are reported as that integer.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Solved values keyed by variable name, then by the instance's original key.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSolution {
    pub objective_value: f64,
    values: IndexMap<String, IndexMap<IndexKey, f64>>,
    columns: Vec<f64>,
}

impl ExtractedSolution {
    /// Value of one instance.
    pub fn value(&self, variable: &str, key: impl Into<IndexKey>) -> std::result::Result<f64, ModelError> {
        let key = key.into();
        let by_key = self.variable(variable)?;
        by_key.get(&key).copied().ok_or_else(|| ModelError::UnknownKey {
            kind: EntityKind::Variable,
            name: variable.to_string(),
            key,
        })
    }

    /// Value of an unindexed variable.
    pub fn scalar(&self, variable: &str) -> std::result::Result<f64, ModelError> {
        self.value(variable, IndexKey::empty())
    }

    /// All instances of one variable in declaration order.
    pub fn variable(&self, variable: &str) -> std::result::Result<&IndexMap<IndexKey, f64>, ModelError> {
        self.values
            .get(variable)
            .ok_or_else(|| ModelError::UnknownReference {
                kind: EntityKind::Variable,
                name: variable.to_string(),
            })
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &IndexMap<IndexKey, f64>)> + '_ {
        self.values.iter().map(|(name, values)| (name.as_str(), values))
    }

    /// Evaluate an expression of the same model at the solution.
    pub fn evaluate(&self, expression: &LinearExpr) -> f64 {
        expression.evaluate(&self.columns)
    }

    /// Left-hand side value of a constraint instance, e.g. `capacidade_fabricas[Manaus]`.
    pub fn constraint_activity(&self, model: &Model, constraint: &str) -> std::result::Result<f64, ModelError> {
        model
            .constraint(constraint)
            .map(|c| c.activity(&self.columns))
            .ok_or_else(|| ModelError::UnknownReference {
                kind: EntityKind::Constraint,
                name: constraint.to_string(),
            })
    }
}

pub struct ResultExtractor;

impl ResultExtractor {
    /// Map an optimal result onto the model's variables.
    ///
    /// Fails with [`SolverError::NotOptimal`] for any other status, and with
    /// [`SolverError::InvalidProblem`] if the result does not cover every column.
    pub fn extract(model: &Model, result: &SolveResult) -> Result<ExtractedSolution> {
        if !result.is_optimal() {
            return Err(SolverError::NotOptimal {
                status: result.status,
            });
        }
        if result.variable_values.len() != model.num_columns() {
            return Err(SolverError::InvalidProblem(format!(
                "solver returned {} values for {} columns",
                result.variable_values.len(),
                model.num_columns()
            )));
        }

        let mut columns = result.variable_values.clone();
        let mut values = IndexMap::new();
        for variable in model.variables() {
            let mut by_key = IndexMap::with_capacity(variable.len());
            for (key, var) in variable.instances() {
                let raw = columns[var.column()];
                let value = if variable.is_integer() {
                    snap_to_integer(raw)
                } else {
                    raw
                };
                columns[var.column()] = value;
                by_key.insert(key.clone(), value);
            }
            values.insert(variable.name().to_string(), by_key);
        }

        let objective_value = result
            .objective_value
            .ok_or_else(|| SolverError::InvalidProblem("optimal result without objective value".to_string()))?;

        Ok(ExtractedSolution {
            objective_value,
            values,
            columns,
        })
    }
}

fn snap_to_integer(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= INTEGRALITY_TOLERANCE {
        // Avoid reporting -0 for columns that came back as a tiny negative.
        rounded + 0.0
    } else {
        value
    }
}
