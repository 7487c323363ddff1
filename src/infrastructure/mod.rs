//! Infrastructure Layer
//!
//! Concrete collaborators behind the domain's seams:
//! - In-memory workspace session over JSON snapshots
//! - CSV roster reader
//! - Per-member conversation state store

pub mod conversation_store;
pub mod roster;
pub mod session;

pub use conversation_store::{ConversationError, ConversationRecord, ConversationStore};
pub use roster::Roster;
pub use session::{InMemorySession, Operation, PostedMessage, SnapshotFile};
