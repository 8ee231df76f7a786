//! Domain models for the farm dashboard

mod crop;
mod lifecycle;

pub use crop::*;
pub use lifecycle::*;
