use tracing::trace;

use super::error::{ModelError, Result};
use super::expression::{LinearExpr, Relation};
use super::index_set::{cartesian_product, IndexSet};
use super::key::IndexKey;
use super::model::Model;
use super::value_objects::ConstraintType;

/// One scalar linear constraint: `expression (constraint_type) bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Composite identifier `family[key]`, or the family name when unindexed.
    pub name: String,
    pub family: String,
    pub key: IndexKey,
    pub constraint_type: ConstraintType,
    pub expression: LinearExpr,
    pub bound: f64,
}

impl Constraint {
    pub(crate) fn from_relation(family: &str, key: IndexKey, relation: Relation) -> Self {
        let (expression, constraint_type, bound) = relation.normalize();
        Self {
            name: key.qualify(family),
            family: family.to_string(),
            key,
            constraint_type,
            expression,
            bound,
        }
    }

    /// Left-hand side value for the given column values.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.expression.evaluate(values)
    }

    pub fn violation(&self, values: &[f64]) -> f64 {
        self.constraint_type.violation(self.activity(values), self.bound)
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.violation(values) <= tolerance
    }

    pub fn num_terms(&self) -> usize {
        self.expression.num_terms()
    }
}

/// A constraint declaration: one rule expanded over the product of its index sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintFamily {
    pub name: String,
    pub index_sets: Vec<String>,
    /// Position of the first generated instance in the model's constraint list.
    pub first: usize,
    pub len: usize,
}

/// Evaluate `rule` once per key-tuple of `sets`, in product order.
///
/// Rules only read the model; any error they raise is wrapped with the
/// identifier of the instance being generated.
pub(crate) fn expand<F>(
    model: &Model,
    name: &str,
    sets: &[&IndexSet],
    rule: F,
) -> Result<Vec<Constraint>>
where
    F: Fn(&Model, &IndexKey) -> Result<Relation>,
{
    cartesian_product(sets)
        .into_iter()
        .map(|key| {
            let relation = rule(model, &key)
                .and_then(|relation| model.check_relation(relation))
                .map_err(|e| ModelError::in_rule(key.qualify(name), e))?;
            let constraint = Constraint::from_relation(name, key, relation);
            trace!(
                component = "model",
                operation = "expand_constraint",
                constraint = %constraint.name,
                sense = %constraint.constraint_type,
                bound = constraint.bound,
                terms = constraint.num_terms(),
                "Generated constraint instance"
            );
            Ok(constraint)
        })
        .collect()
}
