//! # Cosmetic Behavior Traits
//!
//! One sum type, four behavior seams. Implementations are stateless
//! templates: a fresh instance is created per equip and must not retain
//! cross-entity state. Trail and cloak ticks run on worker threads, so the
//! trait objects are `Send + Sync`; every other hook runs on the authority
//! thread.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::category::{CosmeticCategory, SuitSlot};
use crate::descriptor::CosmeticDescriptor;
use crate::geometry::{EntityContext, ParticleInstruction, Rgb};
use crate::ids::EntityId;

/// Failure raised by cosmetic ticks and lifecycle hooks. The runtime logs
/// these and carries on; they never abort a heartbeat.
#[derive(Debug, Error)]
pub enum CosmeticError {
    /// A tick could not produce geometry.
    #[error("tick failed for {id}: {reason}")]
    TickFailed {
        /// Cosmetic id.
        id: String,
        /// Human-readable cause.
        reason: String,
    },
    /// A lifecycle hook refused to run.
    #[error("lifecycle hook failed for {id}: {reason}")]
    HookFailed {
        /// Cosmetic id.
        id: String,
        /// Human-readable cause.
        reason: String,
    },
}

/// Host-neutral description of an armor piece a suit places into an
/// equipment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArmorItem {
    /// Host item identifier, e.g. `golden_helmet`.
    pub item_id: String,
    /// Display name shown on the item.
    pub display_name: String,
    /// Optional dye tint.
    pub tint: Option<Rgb>,
}

impl ArmorItem {
    /// Creates an untinted armor piece.
    #[must_use]
    pub fn new(item_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            display_name: display_name.into(),
            tint: None,
        }
    }

    /// Adds a dye tint.
    #[must_use]
    pub fn with_tint(mut self, tint: Rgb) -> Self {
        self.tint = Some(tint);
        self
    }
}

/// Wardrobe set occupying the four armor slots.
pub trait SuitSet: Send + Sync {
    /// Immutable descriptor attached at registration.
    fn descriptor(&self) -> &CosmeticDescriptor;

    /// The armor piece for one slot, or `None` if the set leaves it empty.
    fn piece(&self, slot: SuitSlot) -> Option<ArmorItem>;

    /// Optional hook to prepare heavy assets before first use.
    fn prepare_assets(&self) -> Result<(), CosmeticError> {
        Ok(())
    }

    /// Fired exactly once when all four slots hold pieces of this set.
    fn on_full_set_start(&self, _ctx: &EntityContext) -> Result<(), CosmeticError> {
        Ok(())
    }

    /// Fired exactly once when the full-set state is left.
    fn on_full_set_end(&self, _ctx: &EntityContext) -> Result<(), CosmeticError> {
        Ok(())
    }
}

/// Particle trail emitted while the owner moves.
pub trait TrailEffect: Send + Sync {
    /// Immutable descriptor attached at registration.
    fn descriptor(&self) -> &CosmeticDescriptor;

    /// Whether this trail wants to emit for the given context. The runtime
    /// enqueues every installed trail; this predicate is consulted on the
    /// worker, keeping the decision in the cosmetic's hands.
    fn should_trigger(&self, ctx: &EntityContext) -> bool {
        ctx.velocity().length_squared() > 1e-4
    }

    /// Computes this tick's emissions. Runs on a worker thread.
    fn tick(&self, ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError>;
}

/// Idle cloak shown after the owner stands still for the dwell period.
pub trait CloakEffect: Send + Sync {
    /// Immutable descriptor attached at registration.
    fn descriptor(&self) -> &CosmeticDescriptor;

    /// Fired exactly once when the dwell period elapses.
    fn on_idle_start(&self, _ctx: &EntityContext) -> Result<(), CosmeticError> {
        Ok(())
    }

    /// Fired exactly once when movement cancels the cloak.
    fn on_cancel(&self, _ctx: &EntityContext) -> Result<(), CosmeticError> {
        Ok(())
    }

    /// Computes this tick's emissions while the cloak is active. Runs on a
    /// worker thread.
    fn tick(&self, ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError>;
}

/// Reaction fired when another entity clicks the owner. Runs synchronously
/// on the authority thread with precise event context; returned instructions
/// are flushed immediately.
pub trait ClickEffect: Send + Sync {
    /// Immutable descriptor attached at registration.
    fn descriptor(&self) -> &CosmeticDescriptor;

    /// Computes the reaction for one interaction.
    fn on_click(
        &self,
        owner: &EntityContext,
        clicker: EntityId,
    ) -> Result<Vec<ParticleInstruction>, CosmeticError>;
}

/// A cosmetic instance. The category is a property of the variant, never
/// stored separately.
#[derive(Clone)]
pub enum Cosmetic {
    /// Armor wardrobe set.
    Suit(Arc<dyn SuitSet>),
    /// Movement particle trail.
    Trail(Arc<dyn TrailEffect>),
    /// Idle cloak.
    Cloak(Arc<dyn CloakEffect>),
    /// Interaction reaction.
    Click(Arc<dyn ClickEffect>),
}

impl Cosmetic {
    /// The descriptor attached at registration.
    #[must_use]
    pub fn descriptor(&self) -> &CosmeticDescriptor {
        match self {
            Self::Suit(suit) => suit.descriptor(),
            Self::Trail(trail) => trail.descriptor(),
            Self::Cloak(cloak) => cloak.descriptor(),
            Self::Click(click) => click.descriptor(),
        }
    }

    /// The category implied by the variant.
    #[must_use]
    pub fn category(&self) -> CosmeticCategory {
        match self {
            Self::Suit(_) => CosmeticCategory::Suit,
            Self::Trail(_) => CosmeticCategory::Trail,
            Self::Cloak(_) => CosmeticCategory::Cloak,
            Self::Click(_) => CosmeticCategory::Click,
        }
    }

    /// Shorthand for the descriptor id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.descriptor().id()
    }

    /// Unwraps the suit variant.
    #[must_use]
    pub fn into_suit(self) -> Option<Arc<dyn SuitSet>> {
        match self {
            Self::Suit(suit) => Some(suit),
            _ => None,
        }
    }

    /// Unwraps the trail variant.
    #[must_use]
    pub fn into_trail(self) -> Option<Arc<dyn TrailEffect>> {
        match self {
            Self::Trail(trail) => Some(trail),
            _ => None,
        }
    }

    /// Unwraps the cloak variant.
    #[must_use]
    pub fn into_cloak(self) -> Option<Arc<dyn CloakEffect>> {
        match self {
            Self::Cloak(cloak) => Some(cloak),
            _ => None,
        }
    }

    /// Unwraps the click variant.
    #[must_use]
    pub fn into_click(self) -> Option<Arc<dyn ClickEffect>> {
        match self {
            Self::Click(click) => Some(click),
            _ => None,
        }
    }
}

impl fmt::Debug for Cosmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cosmetic")
            .field("id", &self.id())
            .field("category", &self.category())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::CosmeticRarity;

    struct NullTrail {
        descriptor: CosmeticDescriptor,
    }

    impl TrailEffect for NullTrail {
        fn descriptor(&self) -> &CosmeticDescriptor {
            &self.descriptor
        }

        fn tick(&self, _ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError> {
            Ok(Vec::new())
        }
    }

    fn null_trail() -> Cosmetic {
        let descriptor = CosmeticDescriptor::builder()
            .id("trail:null")
            .display_name("Null")
            .description("Emits nothing.")
            .icon("stick")
            .rarity(CosmeticRarity::Common)
            .build()
            .unwrap();
        Cosmetic::Trail(Arc::new(NullTrail { descriptor }))
    }

    #[test]
    fn test_category_follows_variant() {
        let cosmetic = null_trail();
        assert_eq!(cosmetic.category(), CosmeticCategory::Trail);
        assert_eq!(cosmetic.id(), "trail:null");
    }

    #[test]
    fn test_variant_unwrap() {
        assert!(null_trail().into_trail().is_some());
        assert!(null_trail().into_cloak().is_none());
        assert!(null_trail().into_suit().is_none());
        assert!(null_trail().into_click().is_none());
    }

    #[test]
    fn test_default_trigger_uses_velocity() {
        let trail = null_trail().into_trail().unwrap();
        let still = EntityContext::new(
            EntityId::new(1),
            crate::ids::WorldId::new(1),
            crate::geometry::Vec3::ZERO,
            crate::geometry::Vec3::ZERO,
            0.0,
            0.0,
            true,
            0,
        );
        assert!(!trail.should_trigger(&still));
        let moving = EntityContext::new(
            EntityId::new(1),
            crate::ids::WorldId::new(1),
            crate::geometry::Vec3::ZERO,
            crate::geometry::Vec3::new(0.3, 0.0, 0.0),
            0.0,
            0.0,
            true,
            0,
        );
        assert!(trail.should_trigger(&moving));
    }
}
