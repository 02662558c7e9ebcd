use indexmap::IndexMap;

use super::error::{EntityKind, ModelError, Result};
use super::expression::{LinearExpr, ModelId, VarRef};
use super::index_set::{cartesian_product, IndexSet};
use super::key::IndexKey;
use super::value_objects::VariableDomain;

/// Indexed decision variable: one instance (column) per key-tuple of its sets
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    index_sets: Vec<String>,
    domain: VariableDomain,
    instances: IndexMap<IndexKey, VarRef>,
}

impl Variable {
    /// Declare the variable, numbering its instances from `first_column` in product order.
    pub(crate) fn new(
        name: impl Into<String>,
        sets: &[&IndexSet],
        domain: VariableDomain,
        model: ModelId,
        first_column: usize,
    ) -> Self {
        let instances = cartesian_product(sets)
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, VarRef::new(model, first_column + i)))
            .collect();

        Self {
            name: name.into(),
            index_sets: sets.iter().map(|s| s.name().to_string()).collect(),
            domain,
            instances,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_sets(&self) -> &[String] {
        &self.index_sets
    }

    pub fn domain(&self) -> VariableDomain {
        self.domain
    }

    pub fn is_integer(&self) -> bool {
        self.domain.is_integer()
    }

    /// The instance for `key`.
    pub fn at(&self, key: impl Into<IndexKey>) -> Result<VarRef> {
        let key = key.into();
        self.instances
            .get(&key)
            .copied()
            .ok_or_else(|| ModelError::UnknownKey {
                kind: EntityKind::Variable,
                name: self.name.clone(),
                key,
            })
    }

    /// `at` as a one-term expression, for use inside sums.
    pub fn expr(&self, key: impl Into<IndexKey>) -> Result<LinearExpr> {
        self.at(key).map(LinearExpr::from)
    }

    /// The single instance of an unindexed variable.
    pub fn scalar(&self) -> Result<VarRef> {
        self.at(IndexKey::empty())
    }

    pub fn instances(&self) -> impl Iterator<Item = (&IndexKey, VarRef)> + '_ {
        self.instances.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Flat view of one variable instance, as handed to solver backends
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub domain: VariableDomain,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Column {
    pub fn is_integer(&self) -> bool {
        self.domain.is_integer()
    }
}
