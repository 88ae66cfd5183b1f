//! Lazily populated map from entity IDs to entity handles

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::error::Result;

type Factory<E> = Box<dyn Fn(&str) -> Result<E>>;

/// Entities of one kind, constructed on first lookup and kept until the
/// connection is dropped
pub struct Repository<E> {
    /// IDs known from the network description, sorted
    ids: Vec<String>,
    factory: Factory<E>,
    entities: RefCell<HashMap<String, Rc<E>>>,
}

impl<E> Repository<E> {
    pub(crate) fn new(ids: Vec<String>, factory: impl Fn(&str) -> Result<E> + 'static) -> Self {
        Self {
            ids,
            factory: Box::new(factory),
            entities: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the entity with `id`, constructing it on first access
    ///
    /// Fails with `NotFound` if the network has no such entity.
    pub fn get_by_id(&self, id: &str) -> Result<Rc<E>> {
        if let Some(entity) = self.entities.borrow().get(id) {
            return Ok(Rc::clone(entity));
        }

        let entity = Rc::new((self.factory)(id)?);
        debug!("constructed entity {:?}", id);

        let mut entities = self.entities.borrow_mut();
        Ok(Rc::clone(entities.entry(id.to_owned()).or_insert(entity)))
    }

    /// Constructs every entity of the network, in ID order
    pub fn get_all(&self) -> Result<Vec<Rc<E>>> {
        self.ids.iter().map(|id| self.get_by_id(id)).collect()
    }

    /// IDs of every entity in the network, sorted
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of entities constructed so far
    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.borrow().is_empty()
    }
}

impl<E> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("ids", &self.ids)
            .field("constructed", &self.len())
            .finish()
    }
}
