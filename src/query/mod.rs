//! Read and write queries over traffic-light variables
//!
//! There is one generic query per verb. [`ReadQuery`] caches its result for
//! the rest of the tick; [`WriteQuery`] stages a value and dispatches it on
//! every `run()`. What a query reads or writes is picked by a variable marker
//! from [`variables`], which also carries the codec between protocol values
//! and domain types.

mod read;
pub mod variables;
mod write;

use std::rc::Rc;

use crate::connection::{Dispatcher, Generation};

pub use read::ReadQuery;
pub use variables::{ReadVariable, WriteVariable};
pub use write::WriteQuery;

pub type ReadCurrentStateQuery = ReadQuery<variables::RedYellowGreenState>;
pub type ReadCurrentPhaseDurationQuery = ReadQuery<variables::PhaseDuration>;
pub type ReadControlledLinksQuery = ReadQuery<variables::ControlledLinksTable>;
pub type CompleteDefinitionQuery = ReadQuery<variables::CompleteDefinition>;
pub type ReadCurrentPhaseIndexQuery = ReadQuery<variables::CurrentPhaseIndex>;
pub type ReadCurrentProgramQuery = ReadQuery<variables::CurrentProgram>;
pub type ReadNextSwitchQuery = ReadQuery<variables::NextSwitch>;

pub type ChangeLightsStateQuery = WriteQuery<variables::SetRedYellowGreenState>;
pub type ChangePhaseIndexQuery = WriteQuery<variables::SetPhaseIndex>;
pub type ChangeProgramQuery = WriteQuery<variables::SetProgram>;
pub type ChangePhaseDurationQuery = WriteQuery<variables::SetPhaseDuration>;
pub type ChangeCompleteProgramQuery = WriteQuery<variables::SetCompleteProgram>;

/// The connection and entity a query is bound to
#[derive(Clone)]
pub(crate) struct Binding {
    dispatcher: Rc<Dispatcher>,
    entity_id: Rc<str>,
    link_count: usize,
}

impl Binding {
    pub(crate) fn new(dispatcher: Rc<Dispatcher>, entity_id: Rc<str>, link_count: usize) -> Self {
        Self {
            dispatcher,
            entity_id,
            link_count,
        }
    }

    fn generation(&self) -> Generation {
        self.dispatcher.generation(&self.entity_id)
    }
}
