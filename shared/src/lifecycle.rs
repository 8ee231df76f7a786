//! Crop lifecycle derivation
//!
//! Turns a crop's planting window, status and condition metrics into the
//! values shown on crop cards, detail dialogs and stat widgets:
//! - growth progress (0-100 %)
//! - days left until the estimated harvest
//! - a coarse growth-stage label
//! - health and irrigation risk flags
//!
//! Everything here is a pure function of its inputs. `now` is always passed in
//! explicitly so callers decide where the clock comes from.
//!
//! Dates are anchored at midnight UTC and all arithmetic is done in
//! milliseconds, so a crop observed at noon is half a day further along than
//! one observed at midnight.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, LifecycleResult};
use crate::models::{
    CropLifecycle, CropRecord, CropStatus, GrowthStage, LifecycleSummary, RiskFlags, StageCount,
    UpcomingHarvest,
};
use crate::types::{date_to_millis, MILLIS_PER_DAY};

/// Progress at which a crop counts as growing
pub const GROWING_FROM_PERCENT: u8 = 30;
/// Progress at which a crop counts as maturing
pub const MATURING_FROM_PERCENT: u8 = 60;
/// Progress at which a crop counts as ready to harvest
pub const READY_FROM_PERCENT: u8 = 90;
/// Health below this value raises a health alert
pub const HEALTH_RISK_BELOW: i32 = 70;
/// Irrigation below this value raises an irrigation alert
pub const IRRIGATION_RISK_BELOW: i32 = 60;

/// Stage boundaries and alert thresholds
///
/// Stage boundaries are inclusive lower bounds: with the defaults a progress
/// of exactly 30 is [`GrowthStage::Growing`] and exactly 90 is
/// [`GrowthStage::ReadyToHarvest`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LifecycleThresholds {
    pub growing_from: u8,
    pub maturing_from: u8,
    pub ready_from: u8,
    pub health_risk_below: i32,
    pub irrigation_risk_below: i32,
}

impl Default for LifecycleThresholds {
    fn default() -> Self {
        Self {
            growing_from: GROWING_FROM_PERCENT,
            maturing_from: MATURING_FROM_PERCENT,
            ready_from: READY_FROM_PERCENT,
            health_risk_below: HEALTH_RISK_BELOW,
            irrigation_risk_below: IRRIGATION_RISK_BELOW,
        }
    }
}

impl LifecycleThresholds {
    /// Stage boundaries must be strictly increasing and at most 100; alert
    /// thresholds must be percentages.
    pub fn validate(&self) -> LifecycleResult<()> {
        if !(self.growing_from < self.maturing_from && self.maturing_from < self.ready_from) {
            return Err(LifecycleError::InvalidThresholds(format!(
                "stage boundaries must increase, got {}/{}/{}",
                self.growing_from, self.maturing_from, self.ready_from
            )));
        }
        if self.ready_from > 100 {
            return Err(LifecycleError::InvalidThresholds(format!(
                "ready_from must be at most 100, got {}",
                self.ready_from
            )));
        }
        for (name, value) in [
            ("health_risk_below", self.health_risk_below),
            ("irrigation_risk_below", self.irrigation_risk_below),
        ] {
            if !(0..=100).contains(&value) {
                return Err(LifecycleError::InvalidThresholds(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Percentage of the planting-to-harvest window elapsed at `now`
///
/// A harvested crop is always at 100 regardless of dates. Before planting the
/// result is 0 and past the estimated harvest it saturates at 100. A window of
/// zero length reads 100 from the planting instant onwards.
pub fn growth_progress(
    planted_date: NaiveDate,
    estimated_harvest_date: NaiveDate,
    status: CropStatus,
    now: DateTime<Utc>,
) -> u8 {
    if status == CropStatus::Harvested {
        return 100;
    }

    let planted = date_to_millis(planted_date);
    let total = date_to_millis(estimated_harvest_date) - planted;
    let elapsed = now.timestamp_millis() - planted;

    if elapsed < 0 {
        return 0;
    }
    if elapsed >= total {
        return 100;
    }

    // 0 <= elapsed < total here, so total > 0. Round half up.
    let elapsed = i128::from(elapsed);
    let total = i128::from(total);
    let percent = (elapsed * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

/// Whole days left until the estimated harvest, rounded up, never negative
pub fn days_until_harvest(estimated_harvest_date: NaiveDate, now: DateTime<Utc>) -> u32 {
    let remaining = date_to_millis(estimated_harvest_date) - now.timestamp_millis();
    if remaining <= 0 {
        return 0;
    }
    let days = (remaining + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Stage label using the default thresholds
pub fn classify_growth_stage(progress: u8, status: CropStatus) -> GrowthStage {
    LifecycleDeriver::default().growth_stage(progress, status)
}

/// Risk flags using the default thresholds
pub fn assess_risk(health: i32, irrigation_level: i32) -> RiskFlags {
    LifecycleDeriver::default().risk_flags(health, irrigation_level)
}

/// Derives lifecycle view-models with a fixed set of thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleDeriver {
    thresholds: LifecycleThresholds,
}

impl LifecycleDeriver {
    pub fn new(thresholds: LifecycleThresholds) -> LifecycleResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &LifecycleThresholds {
        &self.thresholds
    }

    pub fn growth_progress(&self, record: &CropRecord, now: DateTime<Utc>) -> u8 {
        growth_progress(
            record.planted_date,
            record.estimated_harvest_date,
            record.status,
            now,
        )
    }

    pub fn growth_stage(&self, progress: u8, status: CropStatus) -> GrowthStage {
        if status == CropStatus::Harvested {
            return GrowthStage::CycleComplete;
        }

        let t = &self.thresholds;
        if progress < t.growing_from {
            GrowthStage::InitialPhase
        } else if progress < t.maturing_from {
            GrowthStage::Growing
        } else if progress < t.ready_from {
            GrowthStage::Maturing
        } else {
            GrowthStage::ReadyToHarvest
        }
    }

    pub fn risk_flags(&self, health: i32, irrigation_level: i32) -> RiskFlags {
        RiskFlags {
            health_risk: health < self.thresholds.health_risk_below,
            irrigation_risk: irrigation_level < self.thresholds.irrigation_risk_below,
        }
    }

    /// Full view-model for one record
    pub fn derive(&self, record: &CropRecord, now: DateTime<Utc>) -> CropLifecycle {
        let progress = self.growth_progress(record, now);
        let risks = self.risk_flags(record.health, record.irrigation_level);
        let days = if record.is_harvested() {
            None
        } else {
            Some(days_until_harvest(record.estimated_harvest_date, now))
        };

        CropLifecycle {
            id: record.id,
            growth_progress_percent: progress,
            days_until_harvest: days,
            growth_stage: self.growth_stage(progress, record.status),
            health_risk: risks.health_risk,
            irrigation_risk: risks.irrigation_risk,
        }
    }

    pub fn derive_all(&self, records: &[CropRecord], now: DateTime<Utc>) -> Vec<CropLifecycle> {
        records.iter().map(|record| self.derive(record, now)).collect()
    }

    /// Aggregate stage counts, alerts and harvests due within `horizon_days`
    pub fn summarize(
        &self,
        records: &[CropRecord],
        now: DateTime<Utc>,
        horizon_days: u32,
    ) -> LifecycleSummary {
        let mut stages: Vec<StageCount> = GrowthStage::ALL
            .into_iter()
            .map(|stage| StageCount { stage, count: 0 })
            .collect();
        let mut health_risk_count = 0;
        let mut irrigation_risk_count = 0;
        let mut progress_sum: u64 = 0;
        let mut upcoming_harvests = Vec::new();

        for record in records {
            let lifecycle = self.derive(record, now);

            if let Some(entry) = stages.iter_mut().find(|e| e.stage == lifecycle.growth_stage) {
                entry.count += 1;
            }
            if lifecycle.health_risk {
                health_risk_count += 1;
            }
            if lifecycle.irrigation_risk {
                irrigation_risk_count += 1;
            }
            progress_sum += u64::from(lifecycle.growth_progress_percent);

            if let Some(days) = lifecycle.days_until_harvest {
                if days <= horizon_days {
                    upcoming_harvests.push(UpcomingHarvest {
                        id: record.id,
                        name: record.name.clone(),
                        days_until_harvest: days,
                    });
                }
            }
        }

        upcoming_harvests.sort_by_key(|h| h.days_until_harvest);

        let average_progress_percent = match records.len() as u64 {
            0 => 0,
            n => u8::try_from((progress_sum * 2 + n) / (n * 2)).unwrap_or(100),
        };

        LifecycleSummary {
            total_crops: records.len(),
            stages,
            health_risk_count,
            irrigation_risk_count,
            average_progress_percent,
            horizon_days,
            upcoming_harvests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn record(status: CropStatus) -> CropRecord {
        CropRecord {
            id: None,
            name: "Maize".to_string(),
            planted_date: date(2024, 1, 1),
            estimated_harvest_date: date(2024, 1, 11),
            status,
            health: 90,
            irrigation_level: 80,
        }
    }

    // ========================================================================
    // Growth progress
    // ========================================================================

    #[test]
    fn test_midway_through_window() {
        let lifecycle =
            LifecycleDeriver::default().derive(&record(CropStatus::Growing), at(2024, 1, 6));
        assert_eq!(lifecycle.growth_progress_percent, 50);
        assert_eq!(lifecycle.days_until_harvest, Some(5));
        assert_eq!(lifecycle.growth_stage, GrowthStage::Growing);
    }

    #[test]
    fn test_planting_day() {
        let lifecycle =
            LifecycleDeriver::default().derive(&record(CropStatus::Planted), at(2024, 1, 1));
        assert_eq!(lifecycle.growth_progress_percent, 0);
        assert_eq!(lifecycle.days_until_harvest, Some(10));
        assert_eq!(lifecycle.growth_stage, GrowthStage::InitialPhase);
    }

    #[test]
    fn test_overdue_crop_saturates() {
        let lifecycle =
            LifecycleDeriver::default().derive(&record(CropStatus::Growing), at(2024, 1, 15));
        assert_eq!(lifecycle.growth_progress_percent, 100);
        assert_eq!(lifecycle.days_until_harvest, Some(0));
        assert_eq!(lifecycle.growth_stage, GrowthStage::ReadyToHarvest);
    }

    #[test]
    fn test_harvested_overrides_dates() {
        let lifecycle =
            LifecycleDeriver::default().derive(&record(CropStatus::Harvested), at(2023, 6, 1));
        assert_eq!(lifecycle.growth_progress_percent, 100);
        assert_eq!(lifecycle.days_until_harvest, None);
        assert_eq!(lifecycle.growth_stage, GrowthStage::CycleComplete);
    }

    #[test]
    fn test_before_planting_is_zero() {
        let progress = growth_progress(
            date(2024, 1, 1),
            date(2024, 1, 11),
            CropStatus::Planted,
            at(2023, 12, 25),
        );
        assert_eq!(progress, 0);
    }

    #[test]
    fn test_rounds_half_up() {
        // 1 of 8 days elapsed = 12.5 %
        let progress = growth_progress(
            date(2024, 1, 1),
            date(2024, 1, 9),
            CropStatus::Growing,
            at(2024, 1, 2),
        );
        assert_eq!(progress, 13);
    }

    #[test]
    fn test_partial_day_counts() {
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let progress =
            growth_progress(date(2024, 1, 1), date(2024, 1, 11), CropStatus::Growing, noon);
        assert_eq!(progress, 5);
    }

    #[test]
    fn test_zero_length_window() {
        let day = date(2024, 3, 1);
        assert_eq!(growth_progress(day, day, CropStatus::Planted, at(2024, 2, 28)), 0);
        assert_eq!(growth_progress(day, day, CropStatus::Planted, at(2024, 3, 1)), 100);
        assert_eq!(growth_progress(day, day, CropStatus::Planted, at(2024, 3, 5)), 100);
    }

    #[test]
    fn test_reversed_window_stays_in_range() {
        let planted = date(2024, 3, 10);
        let harvest = date(2024, 3, 1);
        assert_eq!(growth_progress(planted, harvest, CropStatus::Growing, at(2024, 3, 5)), 0);
        assert_eq!(growth_progress(planted, harvest, CropStatus::Growing, at(2024, 3, 12)), 100);
    }

    // ========================================================================
    // Days until harvest
    // ========================================================================

    #[test]
    fn test_days_until_harvest_rounds_up() {
        let evening = Utc.with_ymd_and_hms(2024, 1, 9, 18, 0, 0).unwrap();
        assert_eq!(days_until_harvest(date(2024, 1, 11), evening), 2);
    }

    #[test]
    fn test_days_until_harvest_never_negative() {
        assert_eq!(days_until_harvest(date(2024, 1, 11), at(2024, 1, 11)), 0);
        assert_eq!(days_until_harvest(date(2024, 1, 11), at(2025, 1, 1)), 0);
    }

    // ========================================================================
    // Stage labels and risk flags
    // ========================================================================

    #[test]
    fn test_stage_boundaries() {
        let cases = [
            (0, GrowthStage::InitialPhase),
            (29, GrowthStage::InitialPhase),
            (30, GrowthStage::Growing),
            (59, GrowthStage::Growing),
            (60, GrowthStage::Maturing),
            (89, GrowthStage::Maturing),
            (90, GrowthStage::ReadyToHarvest),
            (100, GrowthStage::ReadyToHarvest),
        ];
        for (progress, expected) in cases {
            assert_eq!(
                classify_growth_stage(progress, CropStatus::Growing),
                expected,
                "progress {}",
                progress
            );
        }
    }

    #[test]
    fn test_harvested_stage_short_circuits() {
        assert_eq!(classify_growth_stage(10, CropStatus::Harvested), GrowthStage::CycleComplete);
    }

    #[test]
    fn test_risk_flags() {
        assert_eq!(
            assess_risk(65, 75),
            RiskFlags {
                health_risk: true,
                irrigation_risk: false,
            }
        );
        assert_eq!(
            assess_risk(70, 59),
            RiskFlags {
                health_risk: false,
                irrigation_risk: true,
            }
        );
        // Out-of-range values are evaluated as-is
        assert!(assess_risk(-5, 150).health_risk);
    }

    #[test]
    fn test_custom_thresholds() {
        let deriver = LifecycleDeriver::new(LifecycleThresholds {
            growing_from: 20,
            maturing_from: 50,
            ready_from: 80,
            health_risk_below: 50,
            irrigation_risk_below: 40,
        })
        .unwrap();
        assert_eq!(deriver.growth_stage(25, CropStatus::Growing), GrowthStage::Growing);
        assert_eq!(deriver.growth_stage(80, CropStatus::Growing), GrowthStage::ReadyToHarvest);
        assert!(!deriver.risk_flags(65, 45).any());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(LifecycleThresholds::default().validate().is_ok());

        let unordered = LifecycleThresholds {
            maturing_from: 20,
            ..Default::default()
        };
        assert!(matches!(
            LifecycleDeriver::new(unordered),
            Err(LifecycleError::InvalidThresholds(_))
        ));

        let too_high = LifecycleThresholds {
            ready_from: 120,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());

        let bad_alert = LifecycleThresholds {
            health_risk_below: 101,
            ..Default::default()
        };
        assert!(bad_alert.validate().is_err());
    }

    // ========================================================================
    // Summary
    // ========================================================================

    #[test]
    fn test_summarize() {
        let mut growing = record(CropStatus::Growing);
        growing.name = "Beans".to_string();
        growing.health = 60;

        let mut late = record(CropStatus::Planted);
        late.name = "Squash".to_string();
        late.estimated_harvest_date = date(2024, 3, 1);
        late.irrigation_level = 30;

        let harvested = record(CropStatus::Harvested);

        let summary =
            LifecycleDeriver::default().summarize(&[growing, late, harvested], at(2024, 1, 6), 7);

        assert_eq!(summary.total_crops, 3);
        assert_eq!(summary.count_for(GrowthStage::Growing), 1);
        assert_eq!(summary.count_for(GrowthStage::InitialPhase), 1);
        assert_eq!(summary.count_for(GrowthStage::CycleComplete), 1);
        assert_eq!(summary.count_for(GrowthStage::Maturing), 0);
        assert_eq!(summary.stages.len(), GrowthStage::ALL.len());
        assert_eq!(summary.health_risk_count, 1);
        assert_eq!(summary.irrigation_risk_count, 1);
        assert_eq!(summary.upcoming_harvests.len(), 1);
        assert_eq!(summary.upcoming_harvests[0].name, "Beans");
        assert_eq!(summary.upcoming_harvests[0].days_until_harvest, 5);
    }

    #[test]
    fn test_summarize_orders_upcoming_harvests() {
        let mut first = record(CropStatus::Growing);
        first.name = "Later".to_string();
        first.estimated_harvest_date = date(2024, 1, 20);
        let mut second = record(CropStatus::Growing);
        second.name = "Sooner".to_string();
        second.estimated_harvest_date = date(2024, 1, 8);

        let summary = LifecycleDeriver::default().summarize(&[first, second], at(2024, 1, 6), 30);
        let names: Vec<&str> = summary.upcoming_harvests.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = LifecycleDeriver::default().summarize(&[], at(2024, 1, 6), 7);
        assert_eq!(summary.total_crops, 0);
        assert_eq!(summary.average_progress_percent, 0);
        assert!(summary.upcoming_harvests.is_empty());
    }
}
