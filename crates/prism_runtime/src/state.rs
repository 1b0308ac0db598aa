//! Per-entity runtime state, owned and mutated by the authority thread only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use prism_core::{
    ArmorItem, ClickEffect, CloakEffect, EntityId, SuitSet, SuitSlot, TrailEffect, Vec3,
};

/// Everything the runtime tracks for one entity between apply and teardown.
/// Rebuilt wholesale on every loadout apply; never patched incrementally.
pub(crate) struct ActiveState {
    /// The entity this state belongs to.
    pub entity: EntityId,
    /// Installed trail instance, if one is equipped and unlocked.
    pub trail: Option<Arc<dyn TrailEffect>>,
    /// Installed cloak instance.
    pub cloak: Option<Arc<dyn CloakEffect>>,
    /// Installed click reaction.
    pub click: Option<Arc<dyn ClickEffect>>,
    /// Equipped suit piece key per armor slot, e.g. `suit:phoenix:head`.
    pub suit_pieces: HashMap<SuitSlot, String>,
    /// One shared instance per suit set referenced by `suit_pieces`.
    pub suit_sets: HashMap<String, Arc<dyn SuitSet>>,
    /// Original slot contents recorded before the first override of each
    /// slot. Presence of a key means "we overrode this slot"; the value is
    /// what was there, possibly nothing.
    pub original_armor: HashMap<SuitSlot, Option<ArmorItem>>,
    /// Set ids whose full-set hook has fired and not yet ended.
    pub active_full_sets: HashSet<String>,
    /// Position observed last heartbeat, for velocity derivation.
    pub last_position: Option<Vec3>,
    /// When the entity last moved beyond the movement epsilon.
    pub last_movement_at: Instant,
    /// Whether the idle cloak is currently rendering.
    pub cloak_active: bool,
}

impl ActiveState {
    pub(crate) fn new(entity: EntityId) -> Self {
        Self {
            entity,
            trail: None,
            cloak: None,
            click: None,
            suit_pieces: HashMap::new(),
            suit_sets: HashMap::new(),
            original_armor: HashMap::new(),
            active_full_sets: HashSet::new(),
            last_position: None,
            last_movement_at: Instant::now(),
            cloak_active: false,
        }
    }

    /// Whether any cosmetic is installed at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.trail.is_none()
            && self.cloak.is_none()
            && self.click.is_none()
            && self.suit_pieces.is_empty()
    }
}
