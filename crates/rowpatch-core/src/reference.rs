//! Run-scoped reference variables.
//!
//! References thread integer values (looked-up ids, inserted ids, generated
//! sequence ids) from one instruction to later ones in the same patch.

use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ReferenceError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ReferenceError {
    #[error("Unable to find referenced instruction with name '{name}'")]
    NotFound { name: String },
}

///
/// ReferenceTable
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReferenceTable {
    values: BTreeMap<String, i64>,
}

impl ReferenceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`.
    ///
    /// An existing binding is only replaced when `allow_override` is set.
    /// Returns whether the table changed.
    pub fn set(&mut self, name: &str, value: i64, allow_override: bool) -> bool {
        if !allow_override && self.values.contains_key(name) {
            return false;
        }
        self.values.insert(name.to_string(), value);

        true
    }

    pub fn get(&self, name: &str) -> Result<i64, ReferenceError> {
        self.try_get(name).ok_or_else(|| ReferenceError::NotFound {
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn try_get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the table into its name -> value bindings.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, i64> {
        self.values
    }
}

///
/// TESTS
///
