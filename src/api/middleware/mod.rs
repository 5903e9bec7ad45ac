//! HTTP middleware for request processing.
//!
//! Provides request tracing spans and access logging.

pub mod access_log;
pub mod tracing;
