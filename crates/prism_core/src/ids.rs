//! # Identifier Newtypes
//!
//! Entities and worlds are identified by opaque 64-bit handles handed to the
//! runtime by the host platform. The runtime never interprets them; they are
//! map keys and log fields only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a connected entity.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw host-assigned entity handle.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Opaque identifier for a world the host can resolve.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct WorldId(u64);

impl WorldId {
    /// Wraps a raw host-assigned world handle.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "entity#42");
    }

    #[test]
    fn test_ids_are_map_keys() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(EntityId::new(1), "a");
        map.insert(EntityId::new(2), "b");
        assert_eq!(map.get(&EntityId::new(1)), Some(&"a"));
    }
}
