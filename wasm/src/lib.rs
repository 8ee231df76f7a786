//! WebAssembly module for the farm dashboard
//!
//! Provides client-side computation for:
//! - Crop growth progress and harvest countdowns
//! - Growth-stage labels
//! - Health and irrigation alerts
//! - Dashboard stat widget summaries
//!
//! Every export takes an optional `now_ms` (milliseconds since the epoch).
//! When omitted the browser clock is used.

use chrono::{DateTime, NaiveDate, Utc};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::lifecycle::*;
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

// Helpers return plain strings; they become `JsValue` errors at the export
// boundary so the error paths also run in native tests.

fn resolve_now(now_ms: Option<f64>) -> Result<DateTime<Utc>, String> {
    let millis = now_ms.unwrap_or_else(js_sys::Date::now);
    // `new Date("bad").getTime()` is NaN; an `as` cast would turn that into the epoch
    if !millis.is_finite() {
        return Err(format!("Invalid timestamp: {}", millis));
    }
    shared::types::millis_to_datetime(millis as i64)
        .ok_or_else(|| format!("Invalid timestamp: {}", millis))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| format!("Invalid date '{}': {}", value, e))
}

fn parse_status(value: &str) -> Result<CropStatus, String> {
    value.parse::<CropStatus>().map_err(|e| e.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

/// Invalid records are still derived; the console warning helps spot bad form data
fn warn_if_invalid(record: &CropRecord) {
    if let Err(e) = validate_crop_record(record) {
        console_warn(&format!("crop '{}': {}", record.name, e));
    }
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}

/// Derive the full lifecycle view-model for one crop record (JSON in, JSON out)
#[wasm_bindgen]
pub fn derive_crop_lifecycle(record_json: &str, now_ms: Option<f64>) -> Result<String, JsValue> {
    let record: CropRecord = parse_json(record_json, "crop")?;
    warn_if_invalid(&record);

    let lifecycle = LifecycleDeriver::default().derive(&record, resolve_now(now_ms)?);
    serde_json::to_string(&lifecycle).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Growth progress percentage for a planting window
#[wasm_bindgen]
pub fn crop_growth_progress(
    planted_date: &str,
    estimated_harvest_date: &str,
    status: &str,
    now_ms: Option<f64>,
) -> Result<u8, JsValue> {
    Ok(growth_progress(
        parse_date(planted_date)?,
        parse_date(estimated_harvest_date)?,
        parse_status(status)?,
        resolve_now(now_ms)?,
    ))
}

/// Whole days until the estimated harvest, zero when overdue
#[wasm_bindgen]
pub fn crop_days_until_harvest(
    estimated_harvest_date: &str,
    now_ms: Option<f64>,
) -> Result<u32, JsValue> {
    Ok(days_until_harvest(
        parse_date(estimated_harvest_date)?,
        resolve_now(now_ms)?,
    ))
}

/// Display label for a growth stage
#[wasm_bindgen]
pub fn crop_growth_stage(progress: u8, status: &str) -> Result<String, JsValue> {
    let stage = classify_growth_stage(progress, parse_status(status)?);
    Ok(format!("{}", stage))
}

#[wasm_bindgen]
pub fn crop_health_at_risk(health: i32) -> bool {
    assess_risk(health, 100).health_risk
}

#[wasm_bindgen]
pub fn crop_irrigation_at_risk(irrigation_level: i32) -> bool {
    assess_risk(100, irrigation_level).irrigation_risk
}

/// Stat widget summary for a JSON array of crop records
#[wasm_bindgen]
pub fn summarize_crops(
    records_json: &str,
    now_ms: Option<f64>,
    horizon_days: u32,
) -> Result<String, JsValue> {
    let records: Vec<CropRecord> = parse_json(records_json, "crops")?;
    records.iter().for_each(warn_if_invalid);

    let now = resolve_now(now_ms)?;
    let summary = LifecycleDeriver::default().summarize(&records, now, horizon_days);
    serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether a status change moves forward in the lifecycle
#[wasm_bindgen]
pub fn validate_crop_status_transition(from: &str, to: &str) -> bool {
    match (from.parse::<CropStatus>(), to.parse::<CropStatus>()) {
        (Ok(from), Ok(to)) => from.can_transition_to(to).is_ok(),
        _ => false,
    }
}
