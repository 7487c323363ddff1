//! Presentation Layer
//!
//! Command-line surface and fixed-width report rendering.

pub mod cli;
pub mod report;
