// Immutable numeric tables indexed by index sets

use indexmap::IndexMap;
use std::collections::hash_map::{Entry, HashMap};

use super::error::{EntityKind, ModelError, Result};
use super::index_set::{cartesian_product, IndexSet};
use super::key::IndexKey;

/// A parameter covering every key-tuple of its index domain exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    index_sets: Vec<String>,
    values: IndexMap<IndexKey, f64>,
}

impl Parameter {
    /// Build a parameter over the product of `sets`.
    ///
    /// Values are stored in product order. Fails on a key given twice, then on
    /// the first key of the product with no value, then on any value whose key
    /// lies outside the product.
    pub fn new<K, I>(name: impl Into<String>, sets: &[&IndexSet], values: I) -> Result<Self>
    where
        K: Into<IndexKey>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let name = name.into();
        let mut given: HashMap<IndexKey, f64> = HashMap::new();
        for (key, value) in values {
            match given.entry(key.into()) {
                Entry::Occupied(entry) => {
                    return Err(ModelError::DuplicateValue {
                        parameter: name,
                        key: entry.key().clone(),
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }

        let mut ordered = IndexMap::with_capacity(given.len());
        for key in cartesian_product(sets) {
            match given.remove(&key) {
                Some(value) => {
                    ordered.insert(key, value);
                }
                None => {
                    return Err(ModelError::MissingValue {
                        parameter: name,
                        key,
                    })
                }
            }
        }

        if let Some(key) = given.into_keys().min() {
            return Err(ModelError::UnexpectedKey {
                parameter: name,
                key,
            });
        }

        Ok(Self {
            name,
            index_sets: sets.iter().map(|s| s.name().to_string()).collect(),
            values: ordered,
        })
    }

    /// Unindexed parameter holding a single value.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        let mut values = IndexMap::with_capacity(1);
        values.insert(IndexKey::empty(), value);
        Self {
            name: name.into(),
            index_sets: Vec::new(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_sets(&self) -> &[String] {
        &self.index_sets
    }

    pub fn get(&self, key: impl Into<IndexKey>) -> Result<f64> {
        let key = key.into();
        self.values
            .get(&key)
            .copied()
            .ok_or_else(|| ModelError::UnknownKey {
                kind: EntityKind::Parameter,
                name: self.name.clone(),
                key,
            })
    }

    /// Value of an unindexed parameter.
    pub fn value(&self) -> Result<f64> {
        self.get(IndexKey::empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspectors() -> IndexSet {
        IndexSet::new("INSPETORES", ["I", "II"]).unwrap()
    }

    #[test]
    fn test_full_coverage() {
        let set = inspectors();
        let rate = Parameter::new("TaxaDeInspecao", &[&set], [("I", 25.0), ("II", 15.0)]).unwrap();
        assert_eq!(rate.get("I").unwrap(), 25.0);
        assert_eq!(rate.get("II").unwrap(), 15.0);
        assert_eq!(rate.len(), 2);
    }

    #[test]
    fn test_values_follow_set_order() {
        let set = inspectors();
        let rate = Parameter::new("TaxaDeInspecao", &[&set], [("II", 15.0), ("I", 25.0)]).unwrap();
        let keys: Vec<String> = rate.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["I", "II"]);
    }

    #[test]
    fn test_missing_value() {
        let set = inspectors();
        let err = Parameter::new("CustoHora", &[&set], [("I", 4.0)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingValue {
                parameter: "CustoHora".to_string(),
                key: IndexKey::from("II"),
            }
        );
    }

    #[test]
    fn test_unexpected_key() {
        let set = inspectors();
        let err = Parameter::new("CustoHora", &[&set], [("I", 4.0), ("II", 3.0), ("III", 1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnexpectedKey {
                parameter: "CustoHora".to_string(),
                key: IndexKey::from("III"),
            }
        );
    }

    #[test]
    fn test_repeated_key() {
        let set = inspectors();
        let err = Parameter::new("CustoHora", &[&set], [("I", 4.0), ("II", 3.0), ("I", 99.0)])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateValue {
                parameter: "CustoHora".to_string(),
                key: IndexKey::from("I"),
            }
        );
    }

    #[test]
    fn test_two_dimensional() {
        let products = IndexSet::new("PRODUTOS", ["A", "B"]).unwrap();
        let months = IndexSet::new("MESES", [1, 2]).unwrap();
        let cost = Parameter::new(
            "CustoProducao",
            &[&products, &months],
            [(("A", 1), 52.0), (("A", 2), 23.0), (("B", 1), 100.0), (("B", 2), 60.0)],
        )
        .unwrap();
        assert_eq!(cost.get(("B", 2)).unwrap(), 60.0);
        assert!(matches!(
            cost.get(("C", 1)),
            Err(ModelError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_scalar() {
        let hours = Parameter::scalar("HorasExpediente", 8.0);
        assert_eq!(hours.value().unwrap(), 8.0);
        assert!(hours.index_sets().is_empty());
    }
}
