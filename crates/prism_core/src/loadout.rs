//! # Loadout Contract
//!
//! Per-entity persisted state: the set of unlocked cosmetic keys and a map
//! from slot to equipped key. The store is external and may be stale, so the
//! runtime re-checks `equipped ⊆ unlocked` on every apply rather than
//! trusting the invariant.
//!
//! Store operations are blocking; the runtime performs them on its loader
//! thread, never on the authority thread.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::CosmeticSlot;
use crate::ids::EntityId;
use crate::keys;

/// Failure raised by a loadout store backend.
#[derive(Debug, Error)]
pub enum LoadoutError {
    /// The backend could not serve the request.
    #[error("loadout backend unavailable: {0}")]
    Backend(String),
}

/// Snapshot of an entity's cosmetic ledger and equipped state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticLoadout {
    unlocked: HashSet<String>,
    equipped: HashMap<CosmeticSlot, String>,
}

impl CosmeticLoadout {
    /// Builds a loadout from its parts. Keys are normalized.
    #[must_use]
    pub fn new(unlocked: HashSet<String>, equipped: HashMap<CosmeticSlot, String>) -> Self {
        Self {
            unlocked: unlocked.iter().map(|key| keys::normalize_id(key)).collect(),
            equipped: equipped
                .into_iter()
                .map(|(slot, key)| (slot, keys::normalize_id(&key)))
                .collect(),
        }
    }

    /// The empty loadout.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a cosmetic key is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, key: &str) -> bool {
        self.unlocked.contains(&keys::normalize_id(key))
    }

    /// The key equipped in a slot, if any.
    #[must_use]
    pub fn equipped(&self, slot: CosmeticSlot) -> Option<&str> {
        self.equipped.get(&slot).map(String::as_str)
    }

    /// All unlocked keys.
    #[must_use]
    pub fn unlocked(&self) -> &HashSet<String> {
        &self.unlocked
    }

    /// Whether nothing is unlocked and nothing equipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty() && self.equipped.is_empty()
    }
}

/// Persistence contract behind the runtime. Implementations must tolerate
/// concurrent calls for different entities; per-entity write ordering is the
/// caller's responsibility.
pub trait LoadoutStore: Send + Sync {
    /// Fetches the loadout for an entity. Entities without a profile get the
    /// empty loadout, not an error.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn loadout(&self, entity: EntityId) -> Result<CosmeticLoadout, LoadoutError>;

    /// Adds a key to the unlocked set. Returns whether state actually
    /// changed.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn add_unlocked(&self, entity: EntityId, key: &str) -> Result<bool, LoadoutError>;

    /// Removes a key from the unlocked set, pruning any equipped entries
    /// that referenced it. Returns whether state actually changed.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn remove_unlocked(&self, entity: EntityId, key: &str) -> Result<bool, LoadoutError>;

    /// Equips a key in a slot. A blank key clears the slot instead.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn set_equipped(&self, entity: EntityId, slot: CosmeticSlot, key: &str)
        -> Result<(), LoadoutError>;

    /// Clears a slot.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn clear_equipped(&self, entity: EntityId, slot: CosmeticSlot) -> Result<(), LoadoutError>;

    /// Drops the entity's entire cosmetic document.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::Backend`] if the backend cannot serve the request.
    fn clear_all(&self, entity: EntityId) -> Result<(), LoadoutError>;
}

/// In-memory reference store used by tests and embedders without a
/// database. Empty documents are dropped on write, mirroring how persistent
/// backends store this shape.
#[derive(Default)]
pub struct MemoryLoadoutStore {
    entries: RwLock<HashMap<EntityId, CosmeticLoadout>>,
}

impl MemoryLoadoutStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<T>(
        &self,
        entity: EntityId,
        op: impl FnOnce(&mut CosmeticLoadout) -> T,
    ) -> T {
        let mut entries = self.entries.write();
        let loadout = entries.entry(entity).or_default();
        let result = op(loadout);
        if loadout.is_empty() {
            entries.remove(&entity);
        }
        result
    }
}

impl LoadoutStore for MemoryLoadoutStore {
    fn loadout(&self, entity: EntityId) -> Result<CosmeticLoadout, LoadoutError> {
        Ok(self
            .entries
            .read()
            .get(&entity)
            .cloned()
            .unwrap_or_default())
    }

    fn add_unlocked(&self, entity: EntityId, key: &str) -> Result<bool, LoadoutError> {
        let key = keys::normalize_id(key);
        Ok(self.mutate(entity, |loadout| loadout.unlocked.insert(key)))
    }

    fn remove_unlocked(&self, entity: EntityId, key: &str) -> Result<bool, LoadoutError> {
        let key = keys::normalize_id(key);
        Ok(self.mutate(entity, |loadout| {
            if !loadout.unlocked.remove(&key) {
                return false;
            }
            loadout
                .equipped
                .retain(|_, equipped| loadout.unlocked.contains(equipped));
            true
        }))
    }

    fn set_equipped(
        &self,
        entity: EntityId,
        slot: CosmeticSlot,
        key: &str,
    ) -> Result<(), LoadoutError> {
        let key = keys::normalize_id(key);
        self.mutate(entity, |loadout| {
            if key.is_empty() {
                loadout.equipped.remove(&slot);
            } else {
                loadout.equipped.insert(slot, key);
            }
        });
        Ok(())
    }

    fn clear_equipped(&self, entity: EntityId, slot: CosmeticSlot) -> Result<(), LoadoutError> {
        self.mutate(entity, |loadout| {
            loadout.equipped.remove(&slot);
        });
        Ok(())
    }

    fn clear_all(&self, entity: EntityId) -> Result<(), LoadoutError> {
        self.entries.write().remove(&entity);
        Ok(())
    }
}
