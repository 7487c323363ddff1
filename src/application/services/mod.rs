//! Application Services
//!
//! Services that coordinate domain operations against a session.
//!
//! ## Available Services
//!
//! - **ProvisioningService**: duplicate-safe create/delete of categories and
//!   channels, overwrite edits
//! - **ListingService**: workspace, category, channel and member listings
//! - **BatchService**: per-row channel provisioning from a roster
//! - **HydrationService**: course categories from the workspace configuration

pub mod batch_service;
pub mod hydration_service;
pub mod listing_service;
pub mod provisioning_service;

// Re-export provisioning service types
pub use provisioning_service::{
    CascadeReport, ProvisionError, Provisioned, ProvisioningService, ProvisioningServiceImpl,
};

// Re-export listing service types
pub use listing_service::{ListError, Listing, ListingService, ListingServiceImpl};

// Re-export batch service types
pub use batch_service::{
    welcome_message, BatchError, BatchReport, BatchService, BatchServiceImpl, BatchTarget,
    BatchWindow, RowFailure,
};

// Re-export hydration service types
pub use hydration_service::{
    HydrationError, HydrationOptions, HydrationReport, HydrationService, HydrationServiceImpl,
};
