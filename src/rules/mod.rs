//! Constraint rules for route variables.
//!
//! A template such as `/posts/:id(int, between(1, 100))` attaches the `int`
//! and `between` rules to `id`. Rules are created by name through a
//! [`RuleFactory`]; the default factory knows the built-in rules below, and
//! applications can register their own.

mod builtin;

pub use self::builtin::{
    AlphaRule, AlphanumericRule, BetweenRule, InRule, IntegerRule, NotInRule, NumericRule,
    RegexRule, UuidV4Rule,
};

#[cfg(feature = "date-rule")]
pub use self::builtin::DateRule;

use crate::router::RouterError;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A predicate over the raw text captured for a variable.
pub trait Rule: fmt::Debug + Send + Sync {
    fn matches(&self, value: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleParam {
    Int(i64),
    Float(f64),
    Str(String),
}

impl RuleParam {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(i) => Some(i as f64),
            Self::Float(f) => Some(f),
            Self::Str(ref s) => s.parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// A rule name plus its parameters, as written in a template or supplied at
/// registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    name: Box<str>,
    params: Vec<RuleParam>,
}

impl RuleSpec {
    pub fn new(name: impl Into<Box<str>>, params: Vec<RuleParam>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[RuleParam] {
        &self.params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct RuleParamError {
    msg: String,
}

impl RuleParamError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

type Constructor = Box<dyn Fn(&[RuleParam]) -> Result<Arc<dyn Rule>, RuleParamError> + Send + Sync>;

/// Creates rules by name.
pub struct RuleFactory {
    constructors: HashMap<Box<str>, Constructor>,
}

impl fmt::Debug for RuleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(|k| &**k).collect();
        names.sort_unstable();
        f.debug_struct("RuleFactory").field("rules", &names).finish()
    }
}

impl Default for RuleFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        builtin::register_all(&mut factory);
        factory
    }
}

impl RuleFactory {
    /// A factory without any rules, not even the built-in ones.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers a rule constructor, replacing any previous one of that name.
    pub fn register<R, F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        R: Rule + 'static,
        F: Fn(&[RuleParam]) -> Result<R, RuleParamError> + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Box::new(move |params| constructor(params).map(|r| Arc::new(r) as Arc<dyn Rule>));
        self.constructors.insert(name.into(), constructor);
        self
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create_rule(&self, name: &str, params: &[RuleParam]) -> Result<Arc<dyn Rule>, RouterError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RouterError::UnknownRule(name.to_owned()))?;
        constructor(params).map_err(|source| RouterError::InvalidRuleParameters {
            rule: name.to_owned(),
            source,
        })
    }
}
