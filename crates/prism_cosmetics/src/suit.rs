//! # Suit Cosmetics

use std::sync::Arc;

use prism_core::{
    ArmorItem, Cosmetic, CosmeticDescriptor, CosmeticRarity, DescriptorError, Rgb, SuitSet,
    SuitSlot,
};

/// Phoenix feather tint shared by all pieces.
const PHOENIX_TINT: Rgb = Rgb::new(255, 94, 0);

/// Descriptor for [`PhoenixSuit`].
///
/// # Errors
///
/// Propagates [`DescriptorError`] from the builder.
pub fn phoenix_descriptor() -> Result<CosmeticDescriptor, DescriptorError> {
    CosmeticDescriptor::builder()
        .id("suit:phoenix")
        .display_name("Phoenix Plumage")
        .description("Smoldering feathers that never quite burn out.")
        .icon("blaze_rod")
        .rarity(CosmeticRarity::Legendary)
        .build()
}

/// Registry constructor for [`PhoenixSuit`].
#[must_use]
pub fn phoenix(descriptor: CosmeticDescriptor) -> Cosmetic {
    Cosmetic::Suit(Arc::new(PhoenixSuit { descriptor }))
}

/// Fire-tinted leather wardrobe set.
pub struct PhoenixSuit {
    descriptor: CosmeticDescriptor,
}

impl SuitSet for PhoenixSuit {
    fn descriptor(&self) -> &CosmeticDescriptor {
        &self.descriptor
    }

    fn piece(&self, slot: SuitSlot) -> Option<ArmorItem> {
        let (item_id, display_name) = match slot {
            SuitSlot::Helmet => ("leather_helmet", "Phoenix Crest"),
            SuitSlot::Chest => ("leather_chestplate", "Phoenix Plumage"),
            SuitSlot::Leggings => ("leather_leggings", "Phoenix Tailfeathers"),
            SuitSlot::Boots => ("leather_boots", "Phoenix Talons"),
        };
        Some(ArmorItem::new(item_id, display_name).with_tint(PHOENIX_TINT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_has_a_piece() {
        let suit = PhoenixSuit {
            descriptor: phoenix_descriptor().unwrap(),
        };
        for slot in SuitSlot::ALL {
            let piece = suit.piece(slot).unwrap();
            assert_eq!(piece.tint, Some(PHOENIX_TINT));
            assert!(!piece.item_id.is_empty());
        }
    }

    #[test]
    fn test_pieces_are_distinct_items() {
        let suit = PhoenixSuit {
            descriptor: phoenix_descriptor().unwrap(),
        };
        let helmet = suit.piece(SuitSlot::Helmet).unwrap();
        let boots = suit.piece(SuitSlot::Boots).unwrap();
        assert_ne!(helmet.item_id, boots.item_id);
    }
}
