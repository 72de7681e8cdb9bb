//! Field registry
//!
//! Maps logical field ids to `FormField`s. Components that only need to read
//! or toggle fields (the conditional manager, for one) go through
//! `FieldAccess` instead of the concrete registry.

use super::field::FormField;
use std::collections::{BTreeMap, HashMap};

/// Capabilities a component may use on a field, addressed by id.
///
/// Mutators return false when no field has that id.
pub trait FieldAccess {
    fn value(&self, id: &str) -> Option<&str>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    fn set_visible(&mut self, id: &str, visible: bool) -> bool;
    fn set_required(&mut self, id: &str, required: bool) -> bool;
    /// Empty the value and drop any validation feedback
    fn clear(&mut self, id: &str) -> bool;
}

/// Ordered collection of every field in the form
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FormField>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Build a registry; on duplicate ids the first field wins
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut registry = Self::default();
        for field in fields {
            if registry.index.contains_key(&field.id) {
                tracing::warn!("Duplicate field id {:?} ignored", field.id);
                continue;
            }
            registry
                .index
                .insert(field.id.clone(), registry.fields.len());
            registry.fields.push(field);
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&FormField> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FormField> {
        self.index.get(id).map(|&i| &mut self.fields[i])
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }

    #[allow(dead_code)]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FormField> {
        self.fields.iter_mut()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Snapshot of every value, trimmed, keyed by field id
    pub fn trimmed_values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.id.clone(), f.value.trim().to_string()))
            .collect()
    }

    /// Clear every field
    pub fn clear_all(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
    }
}

impl FieldAccess for FieldRegistry {
    fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|f| f.value.as_str())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.get_mut(id) {
            Some(field) => {
                field.set_value(value);
                true
            }
            None => false,
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(field) => {
                field.is_visible = visible;
                true
            }
            None => false,
        }
    }

    fn set_required(&mut self, id: &str, required: bool) -> bool {
        match self.get_mut(id) {
            Some(field) => {
                field.is_required = required;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(field) => {
                field.clear();
                true
            }
            None => false,
        }
    }
}
