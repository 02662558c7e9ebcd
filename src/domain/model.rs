// The model aggregate: owns every set, parameter, variable, constraint and
// the objective, and exposes them in declaration order.
//
// Declarations are validated eagerly. The first definition error aborts the
// declaration and leaves the model as it was before the call.

use indexmap::IndexMap;
use tracing::debug;

use super::constraint::{self, Constraint, ConstraintFamily};
use super::error::{EntityKind, ModelError, Result};
use super::expression::{LinearExpr, ModelId, Relation, VarRef};
use super::index_set::IndexSet;
use super::key::{IndexKey, Key};
use super::objective::ObjectiveFunction;
use super::parameter::Parameter;
use super::value_objects::{OptimizationType, SolverBackend, UnrecognizedDomain, VariableDomain};
use super::variable::{Column, Variable};

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the search may stop.
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_gap_tolerance(mut self, gap: f64) -> Self {
        self.gap_tolerance = Some(gap);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// A linear / mixed-integer program under construction.
///
/// Clones share the original's identity, so instances of one are accepted by the other.
#[derive(Debug, Clone)]
pub struct Model {
    id: ModelId,
    name: String,
    sets: IndexMap<String, IndexSet>,
    parameters: IndexMap<String, Parameter>,
    variables: IndexMap<String, Variable>,
    num_columns: usize,
    families: IndexMap<String, ConstraintFamily>,
    constraints: Vec<Constraint>,
    objective: Option<ObjectiveFunction>,
    solver_config: SolverConfig,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ModelId::next(),
            name: name.into(),
            sets: IndexMap::new(),
            parameters: IndexMap::new(),
            variables: IndexMap::new(),
            num_columns: 0,
            families: IndexMap::new(),
            constraints: Vec::new(),
            objective: None,
            solver_config: SolverConfig::default(),
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver_config
    }

    // ---- sets ----

    pub fn add_set<K, I>(&mut self, name: impl Into<String>, keys: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        let name = name.into();
        ensure_unique(&self.sets, EntityKind::Set, &name)?;
        let set = IndexSet::new(name.clone(), keys)?;

        debug!(
            component = "model",
            operation = "add_set",
            set = %name,
            size = set.len(),
            "Declared index set"
        );
        self.sets.insert(name, set);
        Ok(())
    }

    /// Append keys to a set nothing is indexed by yet.
    pub fn extend_set<K, I>(&mut self, name: &str, keys: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        self.ensure_set_unlocked(name)?;
        let set = self.sets.get_mut(name).ok_or_else(|| unknown(EntityKind::Set, name))?;
        // Stage on a copy so a duplicate leaves the set untouched.
        let mut staged = set.clone();
        staged.extend(keys)?;
        *set = staged;
        Ok(())
    }

    /// Rename a set nothing is indexed by yet, keeping its position.
    pub fn rename_set(&mut self, name: &str, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        self.ensure_set_unlocked(name)?;
        ensure_unique(&self.sets, EntityKind::Set, &new_name)?;
        let index = self
            .sets
            .get_index_of(name)
            .ok_or_else(|| unknown(EntityKind::Set, name))?;
        let Some((_, mut set)) = self.sets.shift_remove_index(index) else {
            return Err(unknown(EntityKind::Set, name));
        };
        set.rename(new_name.clone());
        self.sets.shift_insert(index, new_name, set);
        Ok(())
    }

    pub fn set(&self, name: &str) -> Result<&IndexSet> {
        self.sets.get(name).ok_or_else(|| unknown(EntityKind::Set, name))
    }

    pub fn sets(&self) -> impl Iterator<Item = &IndexSet> + '_ {
        self.sets.values()
    }

    // ---- parameters ----

    pub fn add_parameter<K, I>(
        &mut self,
        name: impl Into<String>,
        index_sets: &[&str],
        values: I,
    ) -> Result<()>
    where
        K: Into<IndexKey>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let name = name.into();
        ensure_unique(&self.parameters, EntityKind::Parameter, &name)?;
        let sets = self.resolve_sets(index_sets)?;
        let parameter = Parameter::new(name.clone(), &sets, values)?;

        debug!(
            component = "model",
            operation = "add_parameter",
            parameter = %name,
            dimensions = index_sets.len(),
            values = parameter.len(),
            "Declared parameter"
        );
        self.parameters.insert(name, parameter);
        Ok(())
    }

    pub fn add_scalar_parameter(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        ensure_unique(&self.parameters, EntityKind::Parameter, &name)?;

        debug!(
            component = "model",
            operation = "add_parameter",
            parameter = %name,
            dimensions = 0,
            value,
            "Declared scalar parameter"
        );
        self.parameters
            .insert(name.clone(), Parameter::scalar(name, value));
        Ok(())
    }

    pub fn param(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .get(name)
            .ok_or_else(|| unknown(EntityKind::Parameter, name))
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.parameters.values()
    }

    // ---- variables ----

    /// Declare a variable with one instance per key-tuple of `index_sets`.
    ///
    /// `domain` is either a [`VariableDomain`] or its name; an unrecognized
    /// name fails here rather than at solve time.
    pub fn declare_variable<D>(
        &mut self,
        name: impl Into<String>,
        index_sets: &[&str],
        domain: D,
    ) -> Result<()>
    where
        D: TryInto<VariableDomain>,
        D::Error: Into<UnrecognizedDomain>,
    {
        let name = name.into();
        ensure_unique(&self.variables, EntityKind::Variable, &name)?;
        let domain = domain.try_into().map_err(|e| {
            let UnrecognizedDomain(domain) = e.into();
            ModelError::InvalidDomain {
                variable: name.clone(),
                domain,
            }
        })?;
        let sets = self.resolve_sets(index_sets)?;
        let variable = Variable::new(name.clone(), &sets, domain, self.id, self.num_columns);

        debug!(
            component = "model",
            operation = "declare_variable",
            variable = %name,
            domain = %domain,
            first_column = self.num_columns,
            instances = variable.len(),
            "Declared variable"
        );
        self.num_columns += variable.len();
        self.variables.insert(name, variable);
        Ok(())
    }

    pub fn var(&self, name: &str) -> Result<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| unknown(EntityKind::Variable, name))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.variables.values()
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Every variable instance in column order.
    pub fn columns(&self) -> Vec<Column> {
        self.variables
            .values()
            .flat_map(|variable| {
                variable.instances().map(move |(key, _)| Column {
                    name: key.qualify(variable.name()),
                    domain: variable.domain(),
                    lower_bound: variable.domain().lower_bound(),
                    upper_bound: variable.domain().upper_bound(),
                })
            })
            .collect()
    }

    pub fn num_integer_columns(&self) -> usize {
        self.variables
            .values()
            .filter(|v| v.is_integer())
            .map(|v| v.len())
            .sum()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_columns() > 0
    }

    // ---- constraints ----

    /// Expand `rule` over the product of `index_sets` and register one
    /// constraint per key-tuple. An empty set list yields a single constraint
    /// named after the declaration. Returns the number of instances generated.
    pub fn add_constraint<F>(
        &mut self,
        name: impl Into<String>,
        index_sets: &[&str],
        rule: F,
    ) -> Result<usize>
    where
        F: Fn(&Model, &IndexKey) -> Result<Relation>,
    {
        let name = name.into();
        ensure_unique(&self.families, EntityKind::Constraint, &name)?;
        let sets = self.resolve_sets(index_sets)?;
        let generated = constraint::expand(self, &name, &sets, rule)?;
        let count = generated.len();

        let family = ConstraintFamily {
            name: name.clone(),
            index_sets: index_sets.iter().map(|s| s.to_string()).collect(),
            first: self.constraints.len(),
            len: count,
        };
        debug!(
            component = "model",
            operation = "add_constraint",
            constraint = %name,
            dimensions = index_sets.len(),
            instances = family.len,
            "Declared constraint"
        );
        self.constraints.extend(generated);
        self.families.insert(name, family);
        Ok(count)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up one instance by its composite identifier, e.g. `capacidade[Manaus]`.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// All instances generated by one declaration.
    pub fn constraint_family(&self, name: &str) -> Result<&[Constraint]> {
        let family = self
            .families
            .get(name)
            .ok_or_else(|| unknown(EntityKind::Constraint, name))?;
        Ok(&self.constraints[family.first..family.first + family.len])
    }

    pub fn constraint_families(&self) -> impl Iterator<Item = &ConstraintFamily> + '_ {
        self.families.values()
    }

    // ---- objective ----

    pub fn set_objective(
        &mut self,
        optimization_type: OptimizationType,
        expression: LinearExpr,
    ) -> Result<()> {
        if let Some(existing) = &self.objective {
            return Err(ModelError::ObjectiveAlreadySet {
                existing: existing.to_string(),
            });
        }
        self.check_expression(&expression)?;
        let objective = ObjectiveFunction::new(optimization_type, expression);

        debug!(
            component = "model",
            operation = "set_objective",
            sense = %optimization_type,
            terms = objective.num_terms(),
            constant = objective.expression.constant_term(),
            "Set objective function"
        );
        self.objective = Some(objective);
        Ok(())
    }

    /// Build the objective expression from the model itself.
    pub fn set_objective_by_rule<F>(&mut self, optimization_type: OptimizationType, rule: F) -> Result<()>
    where
        F: FnOnce(&Model) -> Result<LinearExpr>,
    {
        if let Some(existing) = &self.objective {
            return Err(ModelError::ObjectiveAlreadySet {
                existing: existing.to_string(),
            });
        }
        let expression = rule(self).map_err(|e| ModelError::in_rule("objective", e))?;
        self.set_objective(optimization_type, expression)
    }

    pub fn minimize(&mut self, expression: LinearExpr) -> Result<()> {
        self.set_objective(OptimizationType::Minimize, expression)
    }

    pub fn maximize(&mut self, expression: LinearExpr) -> Result<()> {
        self.set_objective(OptimizationType::Maximize, expression)
    }

    pub fn objective(&self) -> Option<&ObjectiveFunction> {
        self.objective.as_ref()
    }

    // ---- validation ----

    /// Check the model is complete enough to hand to a solver.
    pub fn validate(&self) -> Result<()> {
        if self.objective.is_none() {
            return Err(ModelError::MissingObjective);
        }
        Ok(())
    }

    pub(crate) fn check_relation(&self, relation: Relation) -> Result<Relation> {
        self.check_expression(&relation.lhs)?;
        self.check_expression(&relation.rhs)?;
        Ok(relation)
    }

    /// Reject instances that do not belong to this model.
    fn check_expression(&self, expression: &LinearExpr) -> Result<()> {
        match expression
            .terms()
            .find(|(var, _)| var.model() != self.id || var.column() >= self.num_columns)
        {
            Some((var, _)) => Err(unknown(
                EntityKind::Variable,
                &format!("column {}", var.column()),
            )),
            None => Ok(()),
        }
    }

    /// Name of the instance behind `var`, e.g. `x[Manaus,Recife]`.
    pub fn column_name(&self, var: VarRef) -> Option<String> {
        self.variables.values().find_map(|variable| {
            variable
                .instances()
                .find(|(_, v)| *v == var)
                .map(|(key, _)| key.qualify(variable.name()))
        })
    }

    fn resolve_sets(&self, names: &[&str]) -> Result<Vec<&IndexSet>> {
        names.iter().map(|name| self.set(name)).collect()
    }

    fn ensure_set_unlocked(&self, name: &str) -> Result<()> {
        let uses = |sets: &[String]| sets.iter().any(|s| s == name);
        let user = self
            .parameters
            .values()
            .find(|p| uses(p.index_sets()))
            .map(|p| format!("parameter '{}'", p.name()))
            .or_else(|| {
                self.variables
                    .values()
                    .find(|v| uses(v.index_sets()))
                    .map(|v| format!("variable '{}'", v.name()))
            })
            .or_else(|| {
                self.families
                    .values()
                    .find(|f| uses(&f.index_sets))
                    .map(|f| format!("constraint '{}'", f.name))
            });

        match user {
            Some(referenced_by) => Err(ModelError::SetLocked {
                set: name.to_string(),
                referenced_by,
            }),
            None => Ok(()),
        }
    }
}

fn unknown(kind: EntityKind, name: &str) -> ModelError {
    ModelError::UnknownReference {
        kind,
        name: name.to_string(),
    }
}

fn ensure_unique<V>(entries: &IndexMap<String, V>, kind: EntityKind, name: &str) -> Result<()> {
    if entries.contains_key(name) {
        return Err(ModelError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ConstraintType;

    fn transport_model() -> Model {
        let mut model = Model::new("transport");
        model
            .add_set("FABRICAS", ["São Paulo", "João Pessoa", "Manaus"])
            .unwrap();
        model
            .add_set("REVENDAS", ["Rio de Janeiro", "Salvador"])
            .unwrap();
        model
            .add_parameter(
                "Demanda",
                &["REVENDAS"],
                [("Rio de Janeiro", 6000.0), ("Salvador", 5000.0)],
            )
            .unwrap();
        model
            .declare_variable("x", &["FABRICAS", "REVENDAS"], VariableDomain::NonNegativeIntegers)
            .unwrap();
        model
    }

    #[test]
    fn test_indexed_constraint_count_is_product_of_set_sizes() {
        let mut model = transport_model();
        let generated = model
            .add_constraint("pair_cap", &["FABRICAS", "REVENDAS"], |m, key| {
                Ok(m.var("x")?.expr(key)?.leq(100.0))
            })
            .unwrap();
        assert_eq!(generated, 6);
        assert_eq!(model.constraints().len(), 6);
        assert_eq!(model.constraints()[0].name, "pair_cap[São Paulo,Rio de Janeiro]");
        assert_eq!(model.constraints()[5].name, "pair_cap[Manaus,Salvador]");
    }

    #[test]
    fn test_unindexed_constraint_yields_one_instance() {
        let mut model = transport_model();
        let generated = model
            .add_constraint("total", &[], |m, key| {
                assert!(key.is_empty());
                let x = m.var("x")?;
                let total: LinearExpr = x.instances().map(|(_, v)| v).sum();
                Ok(total.leq(21000.0))
            })
            .unwrap();
        assert_eq!(generated, 1);
        let total = model.constraint("total").unwrap();
        assert_eq!(total.num_terms(), 6);
        assert_eq!(total.bound, 21000.0);
    }

    #[test]
    fn test_constraint_rule_sums_over_set() {
        let mut model = transport_model();
        model
            .add_constraint("atendimento_demandas", &["REVENDAS"], |m, key| {
                let revenda = &key[0];
                let shipped = m
                    .set("FABRICAS")?
                    .keys()
                    .map(|fabrica| m.var("x")?.expr((fabrica, revenda)))
                    .sum::<Result<LinearExpr>>()?;
                Ok(shipped.equals(m.param("Demanda")?.get(revenda)?))
            })
            .unwrap();

        let salvador = model.constraint("atendimento_demandas[Salvador]").unwrap();
        assert_eq!(salvador.constraint_type, ConstraintType::Equal);
        assert_eq!(salvador.bound, 5000.0);
        assert_eq!(salvador.num_terms(), 3);
        assert_eq!(model.constraint_family("atendimento_demandas").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_reference_in_rule_names_instance() {
        let mut model = transport_model();
        let err = model
            .add_constraint("bad", &["REVENDAS"], |m, key| {
                Ok(m.var("x")?.expr(key)?.leq(m.param("Capacidade")?.get(key)?))
            })
            .unwrap_err();
        match &err {
            ModelError::Rule { instance, .. } => assert_eq!(instance, "bad[Rio de Janeiro]"),
            other => panic!("unexpected error {other:?}"),
        }
        // x is indexed by two sets; a one-part key is unknown before the parameter is looked up.
        assert!(matches!(err.root_cause(), ModelError::UnknownKey { .. }));
        assert!(model.constraints().is_empty());
    }

    #[test]
    fn test_undeclared_parameter_is_unknown_reference() {
        let mut model = transport_model();
        let err = model
            .add_constraint("bad", &[], |m, _| {
                Ok(LinearExpr::zero().leq(m.param("Capacidade")?.value()?))
            })
            .unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ModelError::UnknownReference {
                kind: EntityKind::Parameter,
                name: "Capacidade".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_set_in_declaration() {
        let mut model = transport_model();
        let err = model
            .declare_variable("y", &["MESES"], VariableDomain::Reals)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownReference { kind: EntityKind::Set, .. }));
    }

    #[test]
    fn test_invalid_domain_fails_at_declaration() {
        let mut model = transport_model();
        let err = model
            .declare_variable("y", &["FABRICAS"], "PositiveFloats")
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidDomain {
                variable: "y".to_string(),
                domain: "PositiveFloats".to_string(),
            }
        );
        model
            .declare_variable("y", &["FABRICAS"], "NonNegativeReals")
            .unwrap();
        assert_eq!(model.var("y").unwrap().domain(), VariableDomain::NonNegativeReals);
    }

    #[test]
    fn test_objective_cannot_be_set_twice() {
        let mut model = transport_model();
        let x = model.var("x").unwrap().at(("Manaus", "Salvador")).unwrap();
        model.minimize(4.0 * x).unwrap();
        let err = model.maximize(1.0 * x).unwrap_err();
        assert!(matches!(err, ModelError::ObjectiveAlreadySet { .. }));

        let kept = model.objective().unwrap();
        assert_eq!(kept.optimization_type, OptimizationType::Minimize);
        assert_eq!(kept.expression.coefficient(x), 4.0);

        let err = model
            .set_objective_by_rule(OptimizationType::Minimize, |_| Ok(LinearExpr::zero()))
            .unwrap_err();
        assert!(matches!(err, ModelError::ObjectiveAlreadySet { .. }));
    }

    #[test]
    fn test_sets_lock_once_referenced() {
        let mut model = transport_model();
        let err = model.extend_set("REVENDAS", ["Recife"]).unwrap_err();
        assert!(matches!(err, ModelError::SetLocked { .. }));
        let err = model.rename_set("FABRICAS", "PLANTAS").unwrap_err();
        assert!(matches!(err, ModelError::SetLocked { .. }));

        model.add_set("MESES", [1]).unwrap();
        model.extend_set("MESES", [2]).unwrap();
        assert!(matches!(
            model.extend_set("MESES", [3, 2]),
            Err(ModelError::DuplicateKey { .. })
        ));
        assert_eq!(model.set("MESES").unwrap().len(), 2);
        model.rename_set("MESES", "PERIODOS").unwrap();
        assert_eq!(model.set("PERIODOS").unwrap().len(), 2);
        assert!(model.set("MESES").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut model = transport_model();
        assert!(matches!(
            model.add_set("FABRICAS", ["X"]),
            Err(ModelError::DuplicateName { kind: EntityKind::Set, .. })
        ));
        assert!(matches!(
            model.add_scalar_parameter("Demanda", 1.0),
            Err(ModelError::DuplicateName { kind: EntityKind::Parameter, .. })
        ));
    }

    #[test]
    fn test_repeated_parameter_entry_rejected() {
        let mut model = Model::new("inspection");
        model.add_set("INSPETORES", ["I", "II"]).unwrap();
        let err = model
            .add_parameter("CustoHora", &["INSPETORES"], [("I", 1.0), ("II", 2.0), ("I", 99.0)])
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateValue { .. }));
        assert!(model.param("CustoHora").is_err());
    }

    #[test]
    fn test_foreign_variable_rejected() {
        let mut other = Model::new("other");
        other.declare_variable("a", &[], VariableDomain::Reals).unwrap();
        other.declare_variable("b", &[], VariableDomain::Reals).unwrap();
        let foreign = other.var("b").unwrap().scalar().unwrap();

        let mut model = Model::new("small");
        model.declare_variable("z", &[], VariableDomain::Reals).unwrap();
        assert!(model.minimize(LinearExpr::from(foreign)).is_err());
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_foreign_variable_sharing_a_local_column_rejected() {
        let mut other = Model::new("other");
        other.declare_variable("a", &[], VariableDomain::Reals).unwrap();
        let foreign = other.var("a").unwrap().scalar().unwrap();

        let mut model = Model::new("small");
        model.declare_variable("z", &[], VariableDomain::Reals).unwrap();
        let local = model.var("z").unwrap().scalar().unwrap();
        assert_eq!(foreign.column(), local.column());

        let err = model
            .add_constraint("c", &[], move |_, _| Ok(LinearExpr::from(foreign).leq(3.0)))
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ModelError::UnknownReference { kind: EntityKind::Variable, .. }
        ));
        assert!(model.constraints().is_empty());
        assert!(model.minimize(LinearExpr::from(foreign)).is_err());
        assert!(model.objective().is_none());
        assert_eq!(model.column_name(foreign), None);
        assert_eq!(model.column_name(local).as_deref(), Some("z"));
    }

    #[test]
    fn test_columns_follow_declaration_order() {
        let mut model = transport_model();
        model
            .declare_variable("estoque", &[], VariableDomain::NonNegativeIntegers)
            .unwrap();
        let columns = model.columns();
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0].name, "x[São Paulo,Rio de Janeiro]");
        assert_eq!(columns[6].name, "estoque");
        let stock = model.var("estoque").unwrap().scalar().unwrap();
        assert_eq!(model.column_name(stock).as_deref(), Some("estoque"));
    }
}
