use crate::sheet::Field;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

/// The allowed values of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRule {
    /// Allowed values, in display order.
    pub values: Vec<String>,
    /// Whether values outside the list are accepted.
    pub allow_invalid: bool,
}

impl ListRule {
    /// A rule that rejects anything outside `values`.
    pub fn strict<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            allow_invalid: false,
        }
    }
}

/// Where dropdown rules end up.
pub trait DropdownSink: Send + Sync {
    /// Returns true if the field already has a rule.
    fn is_configured(&self, field: Field) -> bool;

    /// Attach a rule to the field.
    fn configure(&self, field: Field, rule: ListRule);
}

/// A [`DropdownSink`] that records rules per field.
#[derive(Debug, Default)]
pub struct MemoryDropdowns {
    rules: RwLock<HashMap<Field, ListRule>>,
}

impl MemoryDropdowns {
    /// Create a sink with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rule attached to a field.
    pub fn rule(&self, field: Field) -> Option<ListRule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&field)
            .cloned()
    }

    /// Remove the rule attached to a field, so it will be populated again.
    pub fn reset(&self, field: Field) {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&field);
    }
}

impl DropdownSink for MemoryDropdowns {
    fn is_configured(&self, field: Field) -> bool {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&field)
    }

    fn configure(&self, field: Field, rule: ListRule) {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field, rule);
    }
}
