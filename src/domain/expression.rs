// Linear expressions over variable instances and the relations built from them

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::sync::atomic::{AtomicU64, Ordering};

use super::value_objects::ConstraintType;

/// Identity of one [`Model`](super::model::Model); every instance it issues carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to one variable instance: the issuing model and its column there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarRef {
    model: ModelId,
    column: usize,
}

impl VarRef {
    pub(crate) fn new(model: ModelId, column: usize) -> Self {
        Self { model, column }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// `Σ coefficient × instance + constant`.
///
/// Terms are kept sorted by column with duplicates merged and zero
/// coefficients dropped, so equal sums compare equal whatever order they
/// were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarRef, f64>,
    constant: f64,
}

impl LinearExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn term(var: VarRef, coefficient: f64) -> Self {
        let mut expr = Self::zero();
        expr.add_term(var, coefficient);
        expr
    }

    pub fn add_term(&mut self, var: VarRef, coefficient: f64) {
        let merged = self.terms.get(&var).copied().unwrap_or(0.0) + coefficient;
        if merged == 0.0 {
            self.terms.remove(&var);
        } else {
            self.terms.insert(var, merged);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarRef, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn coefficient(&self, var: VarRef) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Value of the expression for the given column values.
    ///
    /// Columns missing from `values` count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.column()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    pub fn leq(self, rhs: impl Into<LinearExpr>) -> Relation {
        Relation::new(self, ConstraintType::LessThanOrEqual, rhs)
    }

    pub fn geq(self, rhs: impl Into<LinearExpr>) -> Relation {
        Relation::new(self, ConstraintType::GreaterThanOrEqual, rhs)
    }

    pub fn equals(self, rhs: impl Into<LinearExpr>) -> Relation {
        Relation::new(self, ConstraintType::Equal, rhs)
    }

    fn scale(mut self, factor: f64) -> Self {
        if factor == 0.0 {
            return Self::zero();
        }
        for coeff in self.terms.values_mut() {
            *coeff *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl From<f64> for LinearExpr {
    fn from(value: f64) -> Self {
        LinearExpr::constant(value)
    }
}

impl From<VarRef> for LinearExpr {
    fn from(var: VarRef) -> Self {
        LinearExpr::term(var, 1.0)
    }
}

impl<R: Into<LinearExpr>> AddAssign<R> for LinearExpr {
    fn add_assign(&mut self, rhs: R) {
        let rhs = rhs.into();
        for (var, coeff) in rhs.terms {
            self.add_term(var, coeff);
        }
        self.constant += rhs.constant;
    }
}

impl<R: Into<LinearExpr>> SubAssign<R> for LinearExpr {
    fn sub_assign(&mut self, rhs: R) {
        let rhs: LinearExpr = rhs.into();
        *self += -rhs;
    }
}

impl<R: Into<LinearExpr>> Add<R> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: R) -> LinearExpr {
        self += rhs;
        self
    }
}

impl<R: Into<LinearExpr>> Sub<R> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: R) -> LinearExpr {
        self -= rhs;
        self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self.scale(-1.0)
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, factor: f64) -> LinearExpr {
        self.scale(factor)
    }
}

impl Mul<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn mul(self, expr: LinearExpr) -> LinearExpr {
        expr.scale(self)
    }
}

impl Add<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn add(self, expr: LinearExpr) -> LinearExpr {
        expr + self
    }
}

impl Sub<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn sub(self, expr: LinearExpr) -> LinearExpr {
        -expr + self
    }
}

impl Mul<f64> for VarRef {
    type Output = LinearExpr;

    fn mul(self, factor: f64) -> LinearExpr {
        LinearExpr::term(self, factor)
    }
}

impl Mul<VarRef> for f64 {
    type Output = LinearExpr;

    fn mul(self, var: VarRef) -> LinearExpr {
        LinearExpr::term(var, self)
    }
}

impl<R: Into<LinearExpr>> Add<R> for VarRef {
    type Output = LinearExpr;

    fn add(self, rhs: R) -> LinearExpr {
        LinearExpr::from(self) + rhs
    }
}

impl<R: Into<LinearExpr>> Sub<R> for VarRef {
    type Output = LinearExpr;

    fn sub(self, rhs: R) -> LinearExpr {
        LinearExpr::from(self) - rhs
    }
}

impl<T: Into<LinearExpr>> Sum<T> for LinearExpr {
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(LinearExpr::zero(), |acc, item| acc + item)
    }
}

/// A comparison between two linear expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub lhs: LinearExpr,
    pub sense: ConstraintType,
    pub rhs: LinearExpr,
}

impl Relation {
    pub fn new(lhs: impl Into<LinearExpr>, sense: ConstraintType, rhs: impl Into<LinearExpr>) -> Self {
        Self {
            lhs: lhs.into(),
            sense,
            rhs: rhs.into(),
        }
    }

    /// Move everything to the left: `Σ terms (sense) bound`.
    pub fn normalize(self) -> (LinearExpr, ConstraintType, f64) {
        let mut expr = self.lhs - self.rhs;
        let bound = -expr.constant;
        expr.constant = 0.0;
        (expr, self.sense, bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> Vec<VarRef> {
        let model = ModelId::next();
        (0..n).map(|column| VarRef::new(model, column)).collect()
    }

    #[test]
    fn test_terms_merge_and_cancel() {
        let vars = columns(2);
        let (x, y) = (vars[0], vars[1]);
        let expr = 2.0 * x + 3.0 * y + x * 4.0 - 3.0 * y;
        assert_eq!(expr.coefficient(x), 6.0);
        assert_eq!(expr.coefficient(y), 0.0);
        assert_eq!(expr.num_terms(), 1);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let vars = columns(4);
        let forward: LinearExpr = vars.iter().map(|&v| 1.5 * v).sum();
        let backward: LinearExpr = vars.iter().rev().map(|&v| 1.5 * v).sum();
        assert_eq!(forward, backward);

        let cost = LinearExpr::from(vars[0]) * 4.0 + 10.0;
        let penalty = LinearExpr::from(vars[1]) * 2.0;
        assert_eq!(cost.clone() + penalty.clone(), penalty + cost);
    }

    #[test]
    fn test_evaluate() {
        let vars = columns(2);
        let (x, y) = (vars[0], vars[1]);
        let expr = 25.0 * x + 15.0 * y + 1.0;
        assert_eq!(expr.evaluate(&[2.0, 3.0]), 96.0);
    }

    #[test]
    fn test_normalize_moves_constants_right() {
        let vars = columns(2);
        let (est, a) = (vars[0], vars[1]);
        // est == 6000 - 10 a
        let (expr, sense, bound) = LinearExpr::from(est).equals(6000.0 - 10.0 * a).normalize();
        assert_eq!(sense, ConstraintType::Equal);
        assert_eq!(bound, 6000.0);
        assert_eq!(expr.coefficient(est), 1.0);
        assert_eq!(expr.coefficient(a), 10.0);
        assert_eq!(expr.constant_term(), 0.0);
    }

    #[test]
    fn test_scaling_by_zero_clears_expression() {
        let expr = (3.0 * columns(3)[2] + 5.0) * 0.0;
        assert_eq!(expr, LinearExpr::zero());
    }
}
