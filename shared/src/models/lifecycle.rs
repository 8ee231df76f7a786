//! Derived lifecycle view-models
//!
//! None of these are stored. They are recomputed from a [`CropRecord`]
//! snapshot whenever a card, dialog or widget renders.
//!
//! [`CropRecord`]: super::CropRecord

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse growth bucket shown on crop cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    /// Below the growing threshold
    InitialPhase,
    Growing,
    Maturing,
    ReadyToHarvest,
    /// Crop has been harvested
    CycleComplete,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 5] = [
        GrowthStage::InitialPhase,
        GrowthStage::Growing,
        GrowthStage::Maturing,
        GrowthStage::ReadyToHarvest,
        GrowthStage::CycleComplete,
    ];
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthStage::InitialPhase => write!(f, "Initial Phase"),
            GrowthStage::Growing => write!(f, "Growing"),
            GrowthStage::Maturing => write!(f, "Maturing"),
            GrowthStage::ReadyToHarvest => write!(f, "Ready to Harvest"),
            GrowthStage::CycleComplete => write!(f, "Cycle Complete"),
        }
    }
}

/// Alert flags for a crop's condition metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RiskFlags {
    pub health_risk: bool,
    pub irrigation_risk: bool,
}

impl RiskFlags {
    pub fn any(&self) -> bool {
        self.health_risk || self.irrigation_risk
    }
}

/// Everything a display component needs about one crop's lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropLifecycle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub growth_progress_percent: u8,
    /// `None` once the crop is harvested
    pub days_until_harvest: Option<u32>,
    pub growth_stage: GrowthStage,
    pub health_risk: bool,
    pub irrigation_risk: bool,
}

impl CropLifecycle {
    pub fn risk_flags(&self) -> RiskFlags {
        RiskFlags {
            health_risk: self.health_risk,
            irrigation_risk: self.irrigation_risk,
        }
    }
}

/// Number of crops in one growth stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageCount {
    pub stage: GrowthStage,
    pub count: usize,
}

/// A crop whose harvest falls inside the summary horizon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpcomingHarvest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub days_until_harvest: u32,
}

/// Aggregate figures for the dashboard stat widgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleSummary {
    pub total_crops: usize,
    /// One entry per stage, in lifecycle order, zero counts included
    pub stages: Vec<StageCount>,
    pub health_risk_count: usize,
    pub irrigation_risk_count: usize,
    pub average_progress_percent: u8,
    pub horizon_days: u32,
    /// Sorted by days remaining, soonest first
    pub upcoming_harvests: Vec<UpcomingHarvest>,
}

impl LifecycleSummary {
    pub fn count_for(&self, stage: GrowthStage) -> usize {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}
