use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ArchiveError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// The two cities the archive runs were built around.
    pub fn defaults() -> Vec<Location> {
        vec![
            Location::new("Karachi", 24.8608, 67.0104),
            Location::new("Islamabad", 33.7215, 73.0433),
        ]
    }

    pub fn coordinates_label(&self) -> String {
        format!("{:.4}°N {:.4}°E", self.latitude, self.longitude)
    }
}

/// Validate a location list: non-empty, each entry in range, names unique.
pub fn validate_locations(locations: &[Location]) -> Result<()> {
    if locations.is_empty() {
        return Err(ArchiveError::Config(
            "At least one location must be configured".to_string(),
        ));
    }

    for (i, location) in locations.iter().enumerate() {
        location.validate()?;

        if locations[..i].iter().any(|l| l.name == location.name) {
            return Err(ArchiveError::Config(format!(
                "Duplicate location name: '{}'",
                location.name
            )));
        }
    }

    Ok(())
}
