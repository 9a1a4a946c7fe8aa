//! # alembic-store: Per-user settings persistence.
//!
//! Implementations of [`alembic_core::SettingsStore`]:
//! - [`JsonFileStore`]: one JSON document keyed by user id, cached in memory
//! - [`MemoryStore`]: process-local store for tests and throwaway runs

pub mod file;
pub mod memory;

pub use file::{default_settings_path, JsonFileStore, StoredConstants};
pub use memory::MemoryStore;
