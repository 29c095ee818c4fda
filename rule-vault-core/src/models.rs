//! Core domain models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single policy rule: positional fields such as subject, object, action
pub type Rule = Vec<String>;

/// A flat storage record for one policy rule
///
/// `vN` is only set when the rule has at least N+1 fields. Missing fields
/// deserialize as empty strings, so short documents never fail to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasbinRule {
    /// Policy type, e.g. `p` or `g2`
    #[serde(default)]
    pub ptype: String,
    #[serde(default)]
    pub v0: String,
    #[serde(default)]
    pub v1: String,
    #[serde(default)]
    pub v2: String,
    #[serde(default)]
    pub v3: String,
    #[serde(default)]
    pub v4: String,
    #[serde(default)]
    pub v5: String,
}

impl CasbinRule {
    /// Positional fields in `v0..v5` order
    pub fn fields(&self) -> [&str; 6] {
        [
            self.v0.as_str(),
            self.v1.as_str(),
            self.v2.as_str(),
            self.v3.as_str(),
            self.v4.as_str(),
            self.v5.as_str(),
        ]
    }
}

/// All rules of one policy type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Policy type this assertion holds
    pub key: String,
    /// Rules in insertion order
    pub policy: Vec<Rule>,
}

impl Assertion {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            policy: Vec::new(),
        }
    }
}

/// In-memory policy model, keyed by section then by policy type
///
/// Sections and policy types are kept in key order, which makes
/// every traversal (and therefore every save) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    sections: BTreeMap<String, BTreeMap<String, Assertion>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty assertion, leaving an existing one untouched
    pub fn add_def(&mut self, sec: &str, ptype: &str) -> &mut Assertion {
        self.sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_insert_with(|| Assertion::new(ptype))
    }

    /// Append a rule, creating the section and assertion on demand
    pub fn add_policy(&mut self, sec: &str, ptype: &str, rule: Rule) {
        self.add_def(sec, ptype).policy.push(rule);
    }

    pub fn assertion(&self, sec: &str, ptype: &str) -> Option<&Assertion> {
        self.sections.get(sec).and_then(|s| s.get(ptype))
    }

    /// Rules stored under `sec`/`ptype`, empty when absent
    pub fn get_policy(&self, sec: &str, ptype: &str) -> &[Rule] {
        self.assertion(sec, ptype)
            .map(|ast| ast.policy.as_slice())
            .unwrap_or(&[])
    }

    pub fn section(&self, sec: &str) -> Option<&BTreeMap<String, Assertion>> {
        self.sections.get(sec)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Assertion>)> {
        self.sections.iter()
    }

    pub fn rule_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|s| s.values())
            .map(|ast| ast.policy.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }
}
