//! Business logic services for the farm dashboard

pub mod lifecycle;
