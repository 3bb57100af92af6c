//! The named-variable store.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::variable::Variable;

/// An in-memory map from names to time-tagged variables.
///
/// Analysis pipelines read input signals from a store and write derived
/// products back under new names, so downstream tooling can address
/// everything uniformly.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    vars: BTreeMap<String, Variable>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, variable: Variable) {
        self.vars.insert(name.into(), variable);
    }

    /// Fetches a variable by name.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`StoreError::NotFound`] | no variable with that name |
    pub fn get(&self, name: &str) -> Result<&Variable, StoreError> {
        self.vars
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Removes a variable, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.vars.remove(name)
    }

    /// Returns whether a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Returns all variable names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.vars.keys().map(String::as_str).collect()
    }

    /// Iterates over `(name, variable)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of stored variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
