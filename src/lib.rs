//! # Guild Admin Library
//!
//! This crate automates administration of a hierarchical workspace
//! (server → category → channel, plus roles and members):
//! - Name-or-ID resolution across nested scopes
//! - Duplicate-safe creation and cascading deletion of categories and channels
//! - Per-principal permission overwrites
//! - Fixed-width listings and roster-driven batch provisioning
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, value objects, the session trait, resolver
//! - **Application Layer**: Provisioning, listing, batch and hydration services
//! - **Infrastructure Layer**: In-memory session, roster reader, conversation store
//! - **Presentation Layer**: CLI and report rendering
//!
//! ## Module Structure
//!
//! ```text
//! guild_admin/
//! +-- config/         Settings and workspace course layout
//! +-- domain/         Entities, value objects, session trait, domain services
//! +-- application/    Application services
//! +-- infrastructure/ Session, roster and conversation state implementations
//! +-- presentation/   CLI surface and report rendering
//! +-- shared/         Common utilities (errors, snowflake IDs, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - CLI and reports
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and command dispatch
pub mod startup;

// Telemetry and observability
pub mod telemetry;
