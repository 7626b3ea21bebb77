//! Core parksim library (readings, gauge, log store, session loop, config).

pub mod config;
pub mod core;
pub mod logging;
