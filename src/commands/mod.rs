//! CLI Command handlers
//!
//! Handlers that need more than a direct library call live here.

pub mod doctor;
