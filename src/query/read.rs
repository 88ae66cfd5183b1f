use std::cell::RefCell;
use std::fmt;

use log::trace;

use crate::connection::Generation;
use crate::error::Result;

use super::variables::ReadVariable;
use super::Binding;

struct Cached<T> {
    generation: Generation,
    value: T,
}

/// Tick-coherent read of one variable of one entity
///
/// The first `get()` in a tick dispatches; later calls in the same tick are
/// served from the cache. Advancing the connection, or a successful write on
/// the same entity, makes the cached value stale.
pub struct ReadQuery<V: ReadVariable> {
    binding: Binding,
    cache: RefCell<Option<Cached<V::Output>>>,
}

impl<V: ReadVariable> ReadQuery<V> {
    pub(crate) fn new(binding: Binding) -> Self {
        Self {
            binding,
            cache: RefCell::new(None),
        }
    }

    pub fn get(&self) -> Result<V::Output> {
        let generation = self.binding.generation();
        if let Some(cached) = self.cache.borrow().as_ref() {
            if cached.generation == generation {
                trace!(
                    "cache hit for {:?} of {:?}",
                    V::VARIABLE,
                    self.binding.entity_id
                );
                return Ok(cached.value.clone());
            }
        }

        let raw = self
            .binding
            .dispatcher
            .get(&self.binding.entity_id, V::VARIABLE)?;
        let value = V::decode(raw, self.binding.link_count)?;
        *self.cache.borrow_mut() = Some(Cached {
            generation,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Drops the cached value so the next `get()` dispatches
    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }

    pub fn is_cached(&self) -> bool {
        let generation = self.binding.generation();
        self.cache
            .borrow()
            .as_ref()
            .is_some_and(|cached| cached.generation == generation)
    }
}

impl<V: ReadVariable> fmt::Debug for ReadQuery<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadQuery")
            .field("entity", &self.binding.entity_id)
            .field("variable", &V::VARIABLE)
            .field("cached", &self.cache.borrow().is_some())
            .finish()
    }
}
