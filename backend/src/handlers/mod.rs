//! HTTP handlers for the farm dashboard

pub mod health;
pub mod lifecycle;

pub use health::*;
pub use lifecycle::*;
