//! Admission Module
//!
//! Rate limiting applied before any call reaches the upstream source.

mod token_bucket;

pub use token_bucket::{AdmissionGate, GateStats};
