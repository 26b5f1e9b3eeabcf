//! Read entities definitions.

pub mod booking;
pub mod payment;
pub mod property;
pub mod stats;
