// Definition errors raised while a model is being built.
// Every variant aborts construction; none is recoverable locally.

use super::key::{IndexKey, Key};

/// Kind of named entity a model owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Set,
    Parameter,
    Variable,
    Constraint,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Set => write!(f, "set"),
            EntityKind::Parameter => write!(f, "parameter"),
            EntityKind::Variable => write!(f, "variable"),
            EntityKind::Constraint => write!(f, "constraint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("set '{set}' contains key {key} more than once")]
    DuplicateKey { set: String, key: Key },

    #[error("parameter '{parameter}' is given more than one value for key [{key}]")]
    DuplicateValue { parameter: String, key: IndexKey },

    #[error("parameter '{parameter}' has no value for key [{key}]")]
    MissingValue { parameter: String, key: IndexKey },

    #[error("parameter '{parameter}' has a value for key [{key}] outside its index domain")]
    UnexpectedKey { parameter: String, key: IndexKey },

    #[error("{kind} '{name}' has no entry for key [{key}]")]
    UnknownKey {
        kind: EntityKind,
        name: String,
        key: IndexKey,
    },

    #[error("variable '{variable}' declared with unrecognized domain '{domain}'")]
    InvalidDomain { variable: String, domain: String },

    #[error("reference to undeclared {kind} '{name}'")]
    UnknownReference { kind: EntityKind, name: String },

    #[error("objective already set ({existing}); refusing to overwrite it")]
    ObjectiveAlreadySet { existing: String },

    #[error("{kind} '{name}' is already declared")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("set '{set}' is indexed by {referenced_by} and can no longer change")]
    SetLocked { set: String, referenced_by: String },

    #[error("model has no objective")]
    MissingObjective,

    #[error("rule for '{instance}' failed: {source}")]
    Rule {
        instance: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Strip any rule context and return the error that was originally raised.
    pub fn root_cause(&self) -> &ModelError {
        match self {
            ModelError::Rule { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_rule(instance: impl Into<String>, source: ModelError) -> Self {
        ModelError::Rule {
            instance: instance.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
