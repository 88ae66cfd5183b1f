use std::fmt;

use crate::error::{Error, Result};

use super::variables::WriteVariable;
use super::Binding;

/// Staged write of one variable of one entity
///
/// `set_value` only stages; every `run()` dispatches the staged value once.
pub struct WriteQuery<V: WriteVariable> {
    binding: Binding,
    staged: Option<V::Input>,
}

impl<V: WriteVariable> WriteQuery<V> {
    pub(crate) fn new(binding: Binding) -> Self {
        Self {
            binding,
            staged: None,
        }
    }

    pub fn set_value(&mut self, value: V::Input) {
        self.staged = Some(value);
    }

    /// Dispatches the staged value
    ///
    /// Payloads are validated against the entity's link count first; a
    /// payload that fails validation is never sent.
    pub fn run(&self) -> Result<()> {
        let staged = self.staged.as_ref().ok_or(Error::NoValueStaged {
            variable: V::VARIABLE,
        })?;
        let payload = V::encode(staged, self.binding.link_count)?;
        self.binding
            .dispatcher
            .set(&self.binding.entity_id, V::VARIABLE, payload)
    }
}

impl<V: WriteVariable> fmt::Debug for WriteQuery<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteQuery")
            .field("entity", &self.binding.entity_id)
            .field("variable", &V::VARIABLE)
            .field("staged", &self.staged.is_some())
            .finish()
    }
}
