//! BDD step definitions for the curing dashboard

pub mod device_steps;
pub mod lifecycle_steps;
pub mod notification_steps;
