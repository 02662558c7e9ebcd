// Named, ordered, deduplicated collections of keys

use indexmap::IndexSet as OrderedKeys;

use super::error::{ModelError, Result};
use super::key::{IndexKey, Key};

/// Index set: keys keep declaration order, which fixes iteration and report order.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSet {
    name: String,
    keys: OrderedKeys<Key>,
}

impl IndexSet {
    /// Create a set, failing on the first repeated key.
    pub fn new<K, I>(name: impl Into<String>, keys: I) -> Result<Self>
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        let mut set = Self {
            name: name.into(),
            keys: OrderedKeys::new(),
        };
        set.extend(keys)?;
        Ok(set)
    }

    pub(crate) fn extend<K, I>(&mut self, keys: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            let key = key.into();
            if self.keys.contains(&key) {
                return Err(ModelError::DuplicateKey {
                    set: self.name.clone(),
                    key,
                });
            }
            self.keys.insert(key);
        }
        Ok(())
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// Position of `key` in declaration order.
    pub fn position(&self, key: &Key) -> Option<usize> {
        self.keys.get_index_of(key)
    }
}

/// Cartesian product of `sets`, nested left to right (the last set varies fastest).
///
/// An empty list of sets yields exactly one empty key.
pub fn cartesian_product(sets: &[&IndexSet]) -> Vec<IndexKey> {
    sets.iter().fold(vec![IndexKey::empty()], |prefixes, set| {
        prefixes
            .iter()
            .flat_map(|prefix| {
                set.keys().map(move |key| {
                    let mut extended = prefix.clone();
                    extended.push(key.clone());
                    extended
                })
            })
            .collect()
    })
}

/// Number of elements in the product of `sets` (1 for no sets).
pub fn product_size(sets: &[&IndexSet]) -> usize {
    sets.iter().map(|s| s.len()).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_keep_declaration_order() {
        let set = IndexSet::new("REVENDAS", ["Rio de Janeiro", "Salvador", "Aracaju"]).unwrap();
        let keys: Vec<String> = set.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Rio de Janeiro", "Salvador", "Aracaju"]);
        assert_eq!(set.position(&Key::from("Aracaju")), Some(2));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = IndexSet::new("MESES", [1, 2, 1]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateKey {
                set: "MESES".to_string(),
                key: Key::Int(1),
            }
        );
    }

    #[test]
    fn test_cartesian_product_order() {
        let products = IndexSet::new("PRODUTOS", ["A", "B"]).unwrap();
        let months = IndexSet::new("MESES", [1, 2]).unwrap();
        let keys = cartesian_product(&[&products, &months]);
        assert_eq!(
            keys,
            vec![
                IndexKey::from(("A", 1)),
                IndexKey::from(("A", 2)),
                IndexKey::from(("B", 1)),
                IndexKey::from(("B", 2)),
            ]
        );
        assert_eq!(product_size(&[&products, &months]), 4);
    }

    #[test]
    fn test_empty_product_is_single_key() {
        assert_eq!(cartesian_product(&[]), vec![IndexKey::empty()]);
        assert_eq!(product_size(&[]), 1);
    }

    #[test]
    fn test_product_with_empty_set_is_empty() {
        let a = IndexSet::new("A", ["x"]).unwrap();
        let empty = IndexSet::new("E", Vec::<Key>::new()).unwrap();
        assert!(cartesian_product(&[&a, &empty]).is_empty());
    }
}
