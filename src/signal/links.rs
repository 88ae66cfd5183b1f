//! Controlled-link topology of a traffic light

use crate::error::{Error, Result};

/// One lane-to-lane connection governed by a signal index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlledLink {
    /// Lane vehicles approach the junction on
    pub incoming_lane: String,
    /// Internal junction lane the link traverses
    pub across_lane: String,
    /// Lane vehicles leave the junction on
    pub outgoing_lane: String,
}

impl ControlledLink {
    pub fn new(
        incoming_lane: impl Into<String>,
        across_lane: impl Into<String>,
        outgoing_lane: impl Into<String>,
    ) -> Self {
        Self {
            incoming_lane: incoming_lane.into(),
            across_lane: across_lane.into(),
            outgoing_lane: outgoing_lane.into(),
        }
    }
}

/// Links controlled by one traffic light, indexed by link index
///
/// A single signal index may govern several physical links, so each index
/// maps to a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlledLinks {
    links: Vec<Vec<ControlledLink>>,
}

impl ControlledLinks {
    pub fn new(links: Vec<Vec<ControlledLink>>) -> Self {
        Self { links }
    }

    /// Builds the table and checks it against the signal's link count
    pub fn with_link_count(links: Vec<Vec<ControlledLink>>, link_count: usize) -> Result<Self> {
        if links.len() != link_count {
            return Err(Error::LengthMismatch {
                what: "controlled links",
                expected: link_count,
                found: links.len(),
            });
        }
        Ok(Self { links })
    }

    pub fn links(&self) -> &[Vec<ControlledLink>] {
        &self.links
    }

    /// Links governed by one signal index
    pub fn for_index(&self, link_index: usize) -> Option<&[ControlledLink]> {
        self.links.get(link_index).map(Vec::as_slice)
    }

    /// Number of signal indices
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
