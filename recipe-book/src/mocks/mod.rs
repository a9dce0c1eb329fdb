//! In-memory collaborators for tests and the demo binary.
//!
//! Clones share state, so a test can hand one clone to the environment and
//! inspect another.

pub mod identity;
pub mod slot;
pub mod storage;

pub use identity::MockIdentityProvider;
pub use slot::InMemorySlot;
pub use storage::{InMemoryRecipeStorage, InMemorySessionStorage};
