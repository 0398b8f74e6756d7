//! Query composition for the calendar tables.

pub mod event;
pub mod membership;
