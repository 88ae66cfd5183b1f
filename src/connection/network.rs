//! Network description: which traffic lights exist and how many links each controls

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkDescription {
    /// Traffic light ID -> controlled-link count
    traffic_lights: BTreeMap<String, usize>,
}

impl NetworkDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_traffic_light(&mut self, id: impl Into<String>, link_count: usize) {
        self.traffic_lights.insert(id.into(), link_count);
    }

    pub fn link_count(&self, id: &str) -> Option<usize> {
        self.traffic_lights.get(id).copied()
    }

    /// Traffic light IDs in sorted order
    pub fn traffic_light_ids(&self) -> impl Iterator<Item = &str> {
        self.traffic_lights.keys().map(String::as_str)
    }

    pub fn traffic_light_count(&self) -> usize {
        self.traffic_lights.len()
    }
}
