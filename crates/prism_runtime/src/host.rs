//! # Host Seam
//!
//! The runtime never talks to a game server directly. Everything it needs
//! from the platform funnels through [`Host`], which the embedder implements
//! and the authority thread calls exclusively. Tests drive the runtime with
//! an in-memory fake.

use prism_core::{ArmorItem, EntityId, ParticleInstruction, SuitSlot, Vec3, WorldId};

/// Live entity state observed at the start of a heartbeat. The runtime
/// derives velocity itself from consecutive positions, so the host only
/// reports what it can see right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// World the entity currently occupies.
    pub world: WorldId,
    /// Current position.
    pub position: Vec3,
    /// Horizontal look angle in degrees.
    pub yaw: f32,
    /// Vertical look angle in degrees.
    pub pitch: f32,
    /// Whether the entity stands on solid ground.
    pub on_ground: bool,
    /// Whether the entity hovers in a host flight mode.
    pub flying: bool,
    /// Whether the entity is mid-glide.
    pub gliding: bool,
}

/// Platform surface the runtime renders through. All calls happen on the
/// authority thread.
pub trait Host {
    /// Observes an entity, or `None` if it is gone.
    fn snapshot(&self, entity: EntityId) -> Option<EntitySnapshot>;

    /// Reads the item currently in an armor slot.
    fn armor(&self, entity: EntityId, slot: SuitSlot) -> Option<ArmorItem>;

    /// Replaces the item in an armor slot. `None` empties the slot.
    fn set_armor(&mut self, entity: EntityId, slot: SuitSlot, item: Option<ArmorItem>);

    /// Whether a world is still loaded. Instructions aimed at unloaded
    /// worlds are dropped at flush time.
    fn world_exists(&self, world: WorldId) -> bool;

    /// Renders one particle emission.
    fn emit(&mut self, instruction: &ParticleInstruction);
}

/// Entity lifecycle notifications the embedder forwards to the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The entity entered the host.
    Joined(EntityId),
    /// The entity respawned; armor slots were reset by the host.
    Respawned(EntityId),
    /// The entity moved to another world.
    ChangedWorld(EntityId),
    /// The entity teleported within a world.
    Teleported(EntityId),
    /// The entity left the host.
    Quit(EntityId),
    /// Another entity clicked the owner.
    Clicked {
        /// The cosmetic owner that was clicked.
        owner: EntityId,
        /// The entity doing the clicking.
        clicker: EntityId,
    },
}
