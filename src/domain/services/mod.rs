//! # Domain Services
//!
//! Domain services encapsulate decision logic that doesn't naturally belong
//! to a single entity.
//!
//! ## Services
//!
//! - **Resolver**: name-or-ID lookups across workspace, category, channel,
//!   role and member scopes
//! - **OverwriteBuilder / OverwriteSet**: per-principal access rule sets
//! - **PermissionService**: effective permission calculation

mod overwrite_builder;
mod permission_service;
mod resolver;

pub use overwrite_builder::*;
pub use permission_service::*;
pub use resolver::*;
