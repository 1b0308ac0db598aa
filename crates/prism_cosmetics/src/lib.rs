//! # PRISM Built-in Cosmetics
//!
//! The cosmetics shipped with the runtime, expressed purely as geometry:
//! every implementation computes [`prism_core::ParticleInstruction`] lists
//! from immutable [`prism_core::EntityContext`] snapshots and never touches
//! the host platform.
//!
//! Call [`install`] once at startup to populate a registry.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod click;
pub mod cloak;
pub mod suit;
pub mod trail;

use prism_core::{CosmeticRegistry, DescriptorError};

pub use click::SparkBurstClick;
pub use cloak::{PatternCloak, Pixel};
pub use suit::PhoenixSuit;
pub use trail::EmberHelixTrail;

/// Registers every built-in cosmetic.
///
/// # Errors
///
/// [`DescriptorError`] if a built-in descriptor is incomplete; this is a
/// programming error in the catalog, surfaced at startup rather than hidden.
pub fn install(registry: &mut CosmeticRegistry) -> Result<(), DescriptorError> {
    registry.register(trail::ember_helix_descriptor()?, trail::ember_helix);
    registry.register(cloak::angel_wings_descriptor()?, cloak::angel_wings);
    registry.register(click::spark_burst_descriptor()?, click::spark_burst);
    registry.register(suit::phoenix_descriptor()?, suit::phoenix);
    registry.log_summary();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::CosmeticCategory;

    #[test]
    fn test_install_registers_all_builtins() {
        let mut registry = CosmeticRegistry::new();
        install(&mut registry).unwrap();
        assert_eq!(registry.len(), 4);
        for id in [
            "trail:ember_helix",
            "cloak:angel_wings",
            "click:spark_burst",
            "suit:phoenix",
        ] {
            assert!(registry.instantiate(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn test_install_is_idempotent_on_duplicates() {
        let mut registry = CosmeticRegistry::new();
        install(&mut registry).unwrap();
        install(&mut registry).unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_categories_match_variants() {
        let mut registry = CosmeticRegistry::new();
        install(&mut registry).unwrap();
        assert_eq!(
            registry.instantiate("suit:phoenix").unwrap().category(),
            CosmeticCategory::Suit
        );
        assert_eq!(
            registry.instantiate("cloak:angel_wings").unwrap().category(),
            CosmeticCategory::Cloak
        );
    }
}
