//! In-memory settings store.

use dashmap::DashMap;

use alembic_core::error::StoreError;
use alembic_core::settings::{SettingsStore, UserConstants, UserId};

/// Settings kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<UserId, UserConstants>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with saved settings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, user: UserId) -> Option<UserConstants> {
        self.records.get(&user).map(|entry| *entry)
    }

    fn save(&self, user: UserId, constants: UserConstants) -> Result<(), StoreError> {
        self.records.insert(user, constants);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alembic_core::settings::get_default_constants;

    #[test]
    fn miss_resolves_to_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.load(UserId(1)), None);
        assert_eq!(store.resolve(UserId(1)), get_default_constants());
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::new();
        let a = UserConstants { cube_volume: 30.0, ..get_default_constants() };
        let b = UserConstants { cube_volume: 80.0, ..get_default_constants() };
        store.save(UserId(1), a).unwrap();
        store.save(UserId(1), b).unwrap();
        assert_eq!(store.load(UserId(1)), Some(b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn users_are_isolated() {
        let store = MemoryStore::new();
        let a = UserConstants { cube_volume: 30.0, ..get_default_constants() };
        store.save(UserId(1), a).unwrap();
        assert_eq!(store.load(UserId(2)), None);
    }
}
