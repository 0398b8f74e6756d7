//! Calendar read and write paths: event persistence, viewer scope resolution
//! and the per-viewer calendar cache.

pub mod cache;
pub mod ports;
pub mod postgres;
pub mod scope;
pub mod service;


pub use cache::{CacheError, CalendarCache, MemoryCache, NoopCache};
pub use ports::{
    CohortLookup, CohortRef, EnrollmentLookup, EventStore, Lookups, OrganizationLookup,
    SectionRef, SectionStaffingLookup,
};
pub use scope::{ViewerScopes, resolve_viewer_scopes};
pub use service::CalendarService;
