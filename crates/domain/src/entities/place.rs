//! Resolved place

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// A display name with its resolved position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Name as entered by the user (or "Start"/"End" for raw coordinates)
    pub name: String,
    /// Resolved position
    pub location: GeoLocation,
}

impl Place {
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}
