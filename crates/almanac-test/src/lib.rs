//! Almanac calendar server - integration test support.
//!
//! In-memory implementations of the calendar storage seams and a harness that
//! assembles the real `CalendarService` and HTTP router around them, so the
//! suite runs without a database.

pub mod directory;
pub mod harness;
pub mod store;

pub use directory::{Lookup, MemoryDirectory};
pub use harness::{FailingCache, Harness, at, jan, proxy_settings, router, window};
pub use store::MemoryEventStore;
