//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **Permissions**: 64-bit permission bitfield with helper methods
//! - **AccessRule / Principal**: per-principal overwrite switches
//! - **Token**: name-or-ID selector built once at the boundary

mod permissions;
mod access_rule;
mod token;

pub use permissions::*;
pub use access_rule::*;
pub use token::*;
