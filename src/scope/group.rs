//! Parameter Group - one notification scope's slots, unique by name.
//!
//! Insertion order is preserved; it decides diff order and therefore the
//! order handlers fire in.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{ParamError, Result};
use crate::parameter::SharedParameter;

/// Ordered collection of tracked parameters with unique names.
#[derive(Default)]
pub struct ParameterGroup {
    slots: IndexMap<String, SharedParameter>,
}

impl ParameterGroup {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slot.
    ///
    /// Fails with [`ParamError::DuplicateName`] if the name is already present.
    pub fn add(&mut self, slot: SharedParameter) -> Result<()> {
        let name = slot.name().to_string();
        if self.slots.contains_key(&name) {
            warn!(name = %name, "duplicate parameter registration");
            return Err(ParamError::DuplicateName { name });
        }
        self.slots.insert(name, slot);
        Ok(())
    }

    /// True if this exact slot is a member.
    pub fn contains(&self, slot: &SharedParameter) -> bool {
        self.slots
            .get(slot.name())
            .is_some_and(|member| Rc::ptr_eq(member, slot))
    }

    /// True if a slot with this name is a member.
    pub fn contains_name(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Slot registered under `name`.
    pub fn get(&self, name: &str) -> Option<&SharedParameter> {
        self.slots.get(name)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedParameter> {
        self.slots.values()
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ParameterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
