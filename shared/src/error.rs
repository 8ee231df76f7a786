//! Error types for crop record validation and lifecycle configuration
//!
//! Deriving lifecycle values never fails; these errors come from the
//! data-entry checks around it.

use thiserror::Error;

use crate::models::CropStatus;

/// Errors raised when a crop record, threshold set or status change is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Estimated harvest date must not precede the planting date")]
    HarvestBeforePlanting,

    #[error("{field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: &'static str, value: i32 },

    #[error("Invalid lifecycle thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Cannot move crop from {from} to {to}")]
    InvalidTransition { from: CropStatus, to: CropStatus },

    #[error("Unknown crop status: {0}")]
    UnknownStatus(String),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
