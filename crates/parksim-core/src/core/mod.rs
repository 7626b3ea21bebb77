//! Core module: UI-agnostic domain and runtime.
//!
//! This module contains:
//! - `reading`: Readings and their safety classification
//! - `gauge`: Fixed-width text bar for a distance
//! - `reading_log`: Append-only CSV log store
//! - `clock`: Wall-clock and sleep capability
//! - `generator`: Seeded distance generator for automatic mode
//! - `interrupt`: Ctrl+C handling
//! - `session`: Manual and automatic session loops

pub mod clock;
pub mod gauge;
pub mod generator;
pub mod interrupt;
pub mod reading;
pub mod reading_log;
pub mod session;
