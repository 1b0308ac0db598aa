//! # PRISM Core
//!
//! Host-neutral foundation of the cosmetic runtime:
//!
//! - Cosmetic type system: categories, slots, rarities, descriptors
//! - Behavior traits for the four cosmetic kinds and the `Cosmetic` sum type
//! - Registry resolving a normalized id to a descriptor or a fresh instance
//! - Immutable geometry value types (the only types allowed to cross the
//!   worker thread boundary)
//! - The loadout persistence contract plus an in-memory reference store
//!
//! ## Architecture Rules
//!
//! 1. **No host-platform types** - armor, particles and entities are
//!    described by plain value types; the runtime crate owns the host seam
//! 2. **Instances are stateless templates** - `instantiate` returns a brand
//!    new value every time, never shared mutable state between entities
//! 3. **Value types are immutable** - contexts and instructions never change
//!    after construction, which is what makes them safe off-thread

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod category;
pub mod cosmetic;
pub mod descriptor;
pub mod geometry;
pub mod ids;
pub mod keys;
pub mod loadout;
pub mod rarity;
pub mod registry;

pub use category::{CosmeticCategory, CosmeticSlot, SuitSlot};
pub use cosmetic::{
    ArmorItem, ClickEffect, CloakEffect, Cosmetic, CosmeticError, SuitSet, TrailEffect,
};
pub use descriptor::{CosmeticDescriptor, DescriptorBuilder, DescriptorError};
pub use geometry::{
    EntityContext, ParticleInstruction, ParticleKind, ParticlePayload, Rgb, Vec3,
};
pub use ids::{EntityId, WorldId};
pub use loadout::{CosmeticLoadout, LoadoutError, LoadoutStore, MemoryLoadoutStore};
pub use rarity::CosmeticRarity;
pub use registry::{CosmeticCtor, CosmeticRegistry};
