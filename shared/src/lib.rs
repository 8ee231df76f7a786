//! Shared types and crop lifecycle logic for the farm dashboard
//!
//! This crate is the single source of truth for crop lifecycle values. The
//! backend and the browser bundle (via WASM) both call through it.

pub mod error;
pub mod lifecycle;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use lifecycle::*;
pub use models::*;
pub use types::*;
pub use validation::*;
