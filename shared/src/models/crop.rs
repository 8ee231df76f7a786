//! Crop ("culture") records

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{LifecycleError, LifecycleResult};
use crate::types::DateRange;

/// A single tracked planting
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CropRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub planted_date: NaiveDate,
    pub estimated_harvest_date: NaiveDate,
    pub status: CropStatus,
    /// Plant condition (0-100)
    #[validate(range(min = 0, max = 100))]
    pub health: i32,
    /// Soil moisture relative to target (0-100)
    #[validate(range(min = 0, max = 100))]
    pub irrigation_level: i32,
}

impl CropRecord {
    pub fn new(
        name: impl Into<String>,
        planted_date: NaiveDate,
        estimated_harvest_date: NaiveDate,
    ) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            name: name.into(),
            planted_date,
            estimated_harvest_date,
            status: CropStatus::Planted,
            health: 100,
            irrigation_level: 100,
        }
    }

    /// Planting-to-harvest window
    pub fn growth_window(&self) -> DateRange {
        DateRange {
            start: self.planted_date,
            end: self.estimated_harvest_date,
        }
    }

    pub fn is_harvested(&self) -> bool {
        self.status == CropStatus::Harvested
    }

    /// Move the record to `target`, rejecting backwards and same-state moves
    pub fn transition(&mut self, target: CropStatus) -> LifecycleResult<()> {
        self.status.can_transition_to(target)?;
        self.status = target;
        Ok(())
    }
}

/// Lifecycle state of a crop, in intended order
///
/// Serializes snake_case. Deserializing goes through `FromStr`, so JSON input
/// accepts the same spellings as the string exports.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    #[default]
    Planted,
    Growing,
    Ready,
    Harvested,
}

impl CropStatus {
    pub const ALL: [CropStatus; 4] = [
        CropStatus::Planted,
        CropStatus::Growing,
        CropStatus::Ready,
        CropStatus::Harvested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropStatus::Planted => "planted",
            CropStatus::Growing => "growing",
            CropStatus::Ready => "ready",
            CropStatus::Harvested => "harvested",
        }
    }

    /// The state that normally follows this one
    pub fn next(&self) -> Option<CropStatus> {
        match self {
            CropStatus::Planted => Some(CropStatus::Growing),
            CropStatus::Growing => Some(CropStatus::Ready),
            CropStatus::Ready => Some(CropStatus::Harvested),
            CropStatus::Harvested => None,
        }
    }

    /// Forward-only check. Skipping states is allowed.
    pub fn can_transition_to(&self, target: CropStatus) -> LifecycleResult<()> {
        if target <= *self {
            return Err(LifecycleError::InvalidTransition {
                from: *self,
                to: target,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropStatus::Planted => write!(f, "Planted"),
            CropStatus::Growing => write!(f, "Growing"),
            CropStatus::Ready => write!(f, "Ready"),
            CropStatus::Harvested => write!(f, "Harvested"),
        }
    }
}

impl std::str::FromStr for CropStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CropStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| LifecycleError::UnknownStatus(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for CropStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
