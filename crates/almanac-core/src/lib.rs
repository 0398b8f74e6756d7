//! Domain types, configuration and error taxonomy shared by every Almanac crate.
//!
//! Nothing in this crate performs I/O beyond loading configuration.

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod types;
