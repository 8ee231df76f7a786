//! Validation utilities for crop records
//!
//! The lifecycle deriver accepts any input. These checks belong to the
//! data-entry layer that decides whether a record may be accepted at all.

use chrono::NaiveDate;
use validator::Validate;

use crate::error::{LifecycleError, LifecycleResult};
use crate::models::CropRecord;

/// Validate that harvest is estimated on or after planting
pub fn validate_growth_window(
    planted_date: NaiveDate,
    estimated_harvest_date: NaiveDate,
) -> LifecycleResult<()> {
    if estimated_harvest_date < planted_date {
        return Err(LifecycleError::HarvestBeforePlanting);
    }
    Ok(())
}

/// Validate a percentage metric is within 0-100
pub fn validate_percentage(field: &'static str, value: i32) -> LifecycleResult<()> {
    if !(0..=100).contains(&value) {
        return Err(LifecycleError::PercentageOutOfRange { field, value });
    }
    Ok(())
}

/// Run every domain check on a record, stopping at the first failure
pub fn validate_crop_record(record: &CropRecord) -> LifecycleResult<()> {
    validate_growth_window(record.planted_date, record.estimated_harvest_date)?;
    validate_percentage("health", record.health)?;
    validate_percentage("irrigation_level", record.irrigation_level)?;
    Ok(())
}

/// Field-level messages from the derive-based checks, for form display
pub fn field_errors(record: &CropRecord) -> Vec<(String, String)> {
    let Err(errors) = record.validate() else {
        return Vec::new();
    };

    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect();
    messages.sort();
    messages
}
