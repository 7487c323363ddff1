//! # Domain Layer
//!
//! The domain layer holds the resource model and the decision logic that
//! does not need the network.
//!
//! ## Structure
//!
//! - **entities**: snapshot entities (Server, Channel, Role, Member, RosterRow)
//! - **value_objects**: immutable value types (Permissions, AccessRule, Token)
//! - **services**: identifier resolution, overwrite building, effective
//!   permission calculation
//! - **session**: the contract of the connected remote session
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Resolution misses are values (`Option`), not errors
//! - The session trait defines remote access; implementations live in the
//!   infrastructure layer

pub mod entities;
pub mod services;
pub mod session;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use session::WorkspaceSession;
pub use value_objects::*;
