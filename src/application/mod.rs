//! Application Layer
//!
//! Services that orchestrate the domain against a workspace session.
//! This layer sits between the CLI surface and the domain layer.

pub mod services;
