//! Decoded input and configuration models.

pub mod analyze;
pub mod config;
