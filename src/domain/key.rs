// Keys of index sets and the composite keys built from them

use std::fmt;
use std::ops::Index;

/// A single element of an index set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
    Tuple(Vec<Key>),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
            Key::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

macro_rules! impl_key_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(value: $t) -> Self {
                    Key::Int(i64::from(value))
                }
            }
        )*
    };
}

// Only integer types that widen losslessly into `i64`.
impl_key_from_int!(i32, i64, u32);

/// The key-tuple identifying one instance of an indexed entity.
///
/// Its length equals the number of index sets of the entity; an unindexed
/// entity is addressed by the empty key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey(Vec<Key>);

impl IndexKey {
    pub fn new(parts: Vec<Key>) -> Self {
        Self(parts)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parts(&self) -> &[Key] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<&Key> {
        self.0.get(position)
    }

    pub(crate) fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    /// `name[key]`, or plain `name` for the empty key.
    pub fn qualify(&self, name: &str) -> String {
        if self.is_empty() {
            name.to_string()
        } else {
            format!("{}[{}]", name, self)
        }
    }
}

impl Index<usize> for IndexKey {
    type Output = Key;

    fn index(&self, position: usize) -> &Key {
        &self.0[position]
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl From<()> for IndexKey {
    fn from(_: ()) -> Self {
        IndexKey::empty()
    }
}

impl From<Key> for IndexKey {
    fn from(key: Key) -> Self {
        IndexKey(vec![key])
    }
}

impl From<&Key> for IndexKey {
    fn from(key: &Key) -> Self {
        IndexKey(vec![key.clone()])
    }
}

impl From<&IndexKey> for IndexKey {
    fn from(key: &IndexKey) -> Self {
        key.clone()
    }
}

impl From<Vec<Key>> for IndexKey {
    fn from(parts: Vec<Key>) -> Self {
        IndexKey(parts)
    }
}

impl From<&str> for IndexKey {
    fn from(value: &str) -> Self {
        IndexKey(vec![Key::from(value)])
    }
}

impl From<String> for IndexKey {
    fn from(value: String) -> Self {
        IndexKey(vec![Key::from(value)])
    }
}

macro_rules! impl_index_key_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IndexKey {
                fn from(value: $t) -> Self {
                    IndexKey(vec![Key::from(value)])
                }
            }
        )*
    };
}

impl_index_key_from_int!(i32, i64, u32);

impl<A, B> From<(A, B)> for IndexKey
where
    A: Into<Key>,
    B: Into<Key>,
{
    fn from((a, b): (A, B)) -> Self {
        IndexKey(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for IndexKey
where
    A: Into<Key>,
    B: Into<Key>,
    C: Into<Key>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        IndexKey(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(IndexKey::from("I"), IndexKey::new(vec![Key::from("I")]));
        assert_eq!(
            IndexKey::from(("A", 1)),
            IndexKey::new(vec![Key::Str("A".into()), Key::Int(1)])
        );
        assert!(IndexKey::from(()).is_empty());
        assert_eq!(Key::from(u32::MAX), Key::Int(4_294_967_295));
        assert_eq!(Key::from(i64::MIN), Key::Int(i64::MIN));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(IndexKey::empty().qualify("atendimento"), "atendimento");
        assert_eq!(
            IndexKey::from(("São Paulo", "Recife")).qualify("x"),
            "x[São Paulo,Recife]"
        );
        assert_eq!(Key::Tuple(vec![Key::Int(1), "a".into()]).to_string(), "(1, a)");
    }
}
