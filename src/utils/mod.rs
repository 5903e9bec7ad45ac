//! Utility functions shared across layers.
//!
//! - [`date`] - Strict `YYYY-MM-DD` parsing for date fields

pub mod date;
