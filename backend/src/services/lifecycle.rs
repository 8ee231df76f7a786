//! Crop lifecycle service for deriving dashboard view-models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    validate_crop_record, CropLifecycle, CropRecord, CropStatus, LifecycleDeriver,
    LifecycleSummary, LifecycleThresholds,
};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Lifecycle service wrapping the configured deriver
#[derive(Clone)]
pub struct LifecycleService {
    deriver: LifecycleDeriver,
}

/// Input for deriving a single record
#[derive(Debug, Deserialize)]
pub struct DeriveLifecycleInput {
    pub record: CropRecord,
    /// Defaults to the server clock
    pub now: Option<DateTime<Utc>>,
}

/// Input for deriving many records at once
#[derive(Debug, Deserialize)]
pub struct BatchLifecycleInput {
    pub records: Vec<CropRecord>,
    pub now: Option<DateTime<Utc>>,
}

/// Input for the dashboard summary
#[derive(Debug, Deserialize)]
pub struct SummaryInput {
    pub records: Vec<CropRecord>,
    pub now: Option<DateTime<Utc>>,
    /// Defaults to the configured horizon
    pub horizon_days: Option<u32>,
}

/// Input for checking a status change
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    pub from: CropStatus,
    pub to: CropStatus,
}

/// Batch derivation response
#[derive(Debug, Serialize)]
pub struct BatchLifecycleResponse {
    pub lifecycles: Vec<CropLifecycle>,
}

/// Status change check response
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub allowed: bool,
    pub from: CropStatus,
    pub to: CropStatus,
}

impl LifecycleService {
    pub fn new(deriver: LifecycleDeriver) -> Self {
        Self { deriver }
    }

    pub fn thresholds(&self) -> LifecycleThresholds {
        *self.deriver.thresholds()
    }

    /// Reject records the data-entry layer would not have accepted
    pub fn validate_record(record: &CropRecord) -> AppResult<()> {
        record.validate()?;
        validate_crop_record(record)?;
        Ok(())
    }

    fn validate_all(records: &[CropRecord]) -> AppResult<()> {
        for (index, record) in records.iter().enumerate() {
            Self::validate_record(record).map_err(|e| e.within(&format!("records[{}]", index)))?;
        }
        Ok(())
    }

    /// Derive the view-model for a single crop
    pub fn derive(&self, record: &CropRecord, now: DateTime<Utc>) -> AppResult<CropLifecycle> {
        Self::validate_record(record).map_err(|e| e.within("record"))?;

        let lifecycle = self.deriver.derive(record, now);
        tracing::debug!(
            crop = %record.name,
            progress = lifecycle.growth_progress_percent,
            stage = ?lifecycle.growth_stage,
            "Derived crop lifecycle"
        );
        Ok(lifecycle)
    }

    /// Derive view-models for every record, preserving order
    pub fn derive_batch(
        &self,
        records: &[CropRecord],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<CropLifecycle>> {
        Self::validate_all(records)?;

        let lifecycles = self.deriver.derive_all(records, now);
        tracing::debug!(count = lifecycles.len(), "Derived crop lifecycles");
        Ok(lifecycles)
    }

    /// Aggregate figures for the stat widgets
    pub fn summarize(
        &self,
        records: &[CropRecord],
        now: DateTime<Utc>,
        horizon_days: u32,
    ) -> AppResult<LifecycleSummary> {
        Self::validate_all(records)?;

        let summary = self.deriver.summarize(records, now, horizon_days);
        tracing::info!(
            total = summary.total_crops,
            health_alerts = summary.health_risk_count,
            irrigation_alerts = summary.irrigation_risk_count,
            upcoming = summary.upcoming_harvests.len(),
            "Summarized crop lifecycles"
        );
        Ok(summary)
    }

    /// Check a status change without applying it
    pub fn check_transition(&self, from: CropStatus, to: CropStatus) -> AppResult<()> {
        from.can_transition_to(to).map_err(|e| {
            tracing::warn!(%from, %to, "Rejected crop status transition");
            AppError::from(e)
        })
    }
}
