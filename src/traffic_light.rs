//! Traffic-light controller handle
//!
//! A `TrafficLight` holds no simulation state of its own. It binds queries
//! to one controller of one connection. Read queries live as long as the
//! handle so that every observer of a variable shares one tick cache.

use std::fmt;
use std::rc::Rc;

use crate::connection::Dispatcher;
use crate::error::{Error, Result};
use crate::query::{
    Binding, ChangeCompleteProgramQuery, ChangeLightsStateQuery, ChangePhaseDurationQuery,
    ChangePhaseIndexQuery, ChangeProgramQuery, CompleteDefinitionQuery, ReadControlledLinksQuery,
    ReadCurrentPhaseDurationQuery, ReadCurrentPhaseIndexQuery, ReadCurrentProgramQuery,
    ReadCurrentStateQuery, ReadNextSwitchQuery, ReadQuery, WriteQuery,
};

pub struct TrafficLight {
    id: Rc<str>,
    link_count: usize,
    binding: Binding,
    read_current_state: ReadCurrentStateQuery,
    read_current_phase_duration: ReadCurrentPhaseDurationQuery,
    read_controlled_links: ReadControlledLinksQuery,
    complete_definition: CompleteDefinitionQuery,
    read_current_phase_index: ReadCurrentPhaseIndexQuery,
    read_current_program: ReadCurrentProgramQuery,
    read_next_switch: ReadNextSwitchQuery,
}

impl TrafficLight {
    /// Binds a handle to the controller `id`, resolving its link count from
    /// the network description
    pub(crate) fn bind(id: &str, dispatcher: &Rc<Dispatcher>) -> Result<Self> {
        let link_count = dispatcher
            .network()
            .link_count(id)
            .ok_or_else(|| Error::NotFound { id: id.to_owned() })?;
        let id: Rc<str> = Rc::from(id);
        let binding = Binding::new(Rc::clone(dispatcher), Rc::clone(&id), link_count);

        Ok(Self {
            read_current_state: ReadQuery::new(binding.clone()),
            read_current_phase_duration: ReadQuery::new(binding.clone()),
            read_controlled_links: ReadQuery::new(binding.clone()),
            complete_definition: ReadQuery::new(binding.clone()),
            read_current_phase_index: ReadQuery::new(binding.clone()),
            read_current_program: ReadQuery::new(binding.clone()),
            read_next_switch: ReadQuery::new(binding.clone()),
            id,
            link_count,
            binding,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of controlled links, the length of every state of this light
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn read_current_state_query(&self) -> &ReadCurrentStateQuery {
        &self.read_current_state
    }

    pub fn read_current_phase_duration_query(&self) -> &ReadCurrentPhaseDurationQuery {
        &self.read_current_phase_duration
    }

    pub fn read_controlled_links_query(&self) -> &ReadControlledLinksQuery {
        &self.read_controlled_links
    }

    pub fn complete_definition_query(&self) -> &CompleteDefinitionQuery {
        &self.complete_definition
    }

    pub fn read_current_phase_index_query(&self) -> &ReadCurrentPhaseIndexQuery {
        &self.read_current_phase_index
    }

    pub fn read_current_program_query(&self) -> &ReadCurrentProgramQuery {
        &self.read_current_program
    }

    pub fn read_next_switch_query(&self) -> &ReadNextSwitchQuery {
        &self.read_next_switch
    }

    pub fn change_lights_state_query(&self) -> ChangeLightsStateQuery {
        WriteQuery::new(self.binding.clone())
    }

    pub fn change_phase_index_query(&self) -> ChangePhaseIndexQuery {
        WriteQuery::new(self.binding.clone())
    }

    pub fn change_program_query(&self) -> ChangeProgramQuery {
        WriteQuery::new(self.binding.clone())
    }

    pub fn change_phase_duration_query(&self) -> ChangePhaseDurationQuery {
        WriteQuery::new(self.binding.clone())
    }

    pub fn change_complete_program_query(&self) -> ChangeCompleteProgramQuery {
        WriteQuery::new(self.binding.clone())
    }
}

impl fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrafficLight")
            .field("id", &self.id)
            .field("link_count", &self.link_count)
            .finish()
    }
}
