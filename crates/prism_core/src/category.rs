//! # Categories and Slots
//!
//! The category <-> slot mapping is fixed and total: every slot belongs to
//! exactly one category. Suit spans four armor slots; trail, cloak and click
//! are singleton slots.

use serde::{Deserialize, Serialize};

/// High level cosmetic category, parsed from id prefixes such as
/// `trail:helix`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CosmeticCategory {
    /// Armor-slot wardrobe sets.
    Suit,
    /// Particle trails following the owner around.
    Trail,
    /// Idle cloaks rendered while the owner stands still.
    Cloak,
    /// Reactions fired when another entity clicks the owner.
    Click,
}

impl CosmeticCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 4] = [Self::Suit, Self::Trail, Self::Cloak, Self::Click];

    /// Returns the id prefix for this category.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Suit => "suit",
            Self::Trail => "trail",
            Self::Cloak => "cloak",
            Self::Click => "click",
        }
    }

    /// Parses a category from a raw prefix. Unknown or blank prefixes yield
    /// `None`, never an error.
    #[must_use]
    pub fn from_prefix(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|category| category.prefix().eq_ignore_ascii_case(trimmed))
    }
}

/// Equip locations that can hold a cosmetic key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticSlot {
    /// Suit helmet slot.
    SuitHelmet,
    /// Suit chestplate slot.
    SuitChest,
    /// Suit leggings slot.
    SuitLeggings,
    /// Suit boots slot.
    SuitBoots,
    /// Singleton trail slot.
    Trail,
    /// Singleton cloak slot.
    Cloak,
    /// Singleton click effect slot.
    Click,
}

impl CosmeticSlot {
    /// All slots, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::SuitHelmet,
        Self::SuitChest,
        Self::SuitLeggings,
        Self::SuitBoots,
        Self::Trail,
        Self::Cloak,
        Self::Click,
    ];

    /// Stable key used by loadout store backends.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::SuitHelmet => "suit_helmet",
            Self::SuitChest => "suit_chest",
            Self::SuitLeggings => "suit_leggings",
            Self::SuitBoots => "suit_boots",
            Self::Trail => "trail",
            Self::Cloak => "cloak",
            Self::Click => "click",
        }
    }

    /// The single category this slot belongs to.
    #[must_use]
    pub const fn category(self) -> CosmeticCategory {
        match self {
            Self::SuitHelmet | Self::SuitChest | Self::SuitLeggings | Self::SuitBoots => {
                CosmeticCategory::Suit
            }
            Self::Trail => CosmeticCategory::Trail,
            Self::Cloak => CosmeticCategory::Cloak,
            Self::Click => CosmeticCategory::Click,
        }
    }

    /// Parses a slot from its storage key. Unknown keys yield `None`.
    #[must_use]
    pub fn from_storage_key(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|slot| slot.storage_key().eq_ignore_ascii_case(trimmed))
    }
}

/// The four armor slots occupied by a [`crate::cosmetic::SuitSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuitSlot {
    /// Head armor.
    Helmet,
    /// Chest armor.
    Chest,
    /// Leg armor.
    Leggings,
    /// Foot armor.
    Boots,
}

impl SuitSlot {
    /// All suit slots, in declaration order. A suit is "full" when every one
    /// of these holds a piece of the same set.
    pub const ALL: [Self; 4] = [Self::Helmet, Self::Chest, Self::Leggings, Self::Boots];

    /// Suffix used in piece keys such as `suit:phoenix:head`.
    #[must_use]
    pub const fn storage_suffix(self) -> &'static str {
        match self {
            Self::Helmet => "head",
            Self::Chest => "chest",
            Self::Leggings => "leggings",
            Self::Boots => "boots",
        }
    }

    /// The equip slot this suit slot occupies.
    #[must_use]
    pub const fn cosmetic_slot(self) -> CosmeticSlot {
        match self {
            Self::Helmet => CosmeticSlot::SuitHelmet,
            Self::Chest => CosmeticSlot::SuitChest,
            Self::Leggings => CosmeticSlot::SuitLeggings,
            Self::Boots => CosmeticSlot::SuitBoots,
        }
    }

    /// Parses a suit slot from a piece-key suffix. Unknown suffixes yield
    /// `None`.
    #[must_use]
    pub fn from_storage_suffix(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|slot| slot.storage_suffix().eq_ignore_ascii_case(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_prefix_roundtrip() {
        for category in CosmeticCategory::ALL {
            assert_eq!(
                CosmeticCategory::from_prefix(category.prefix()),
                Some(category)
            );
        }
    }

    #[test]
    fn test_category_unknown_prefix() {
        assert_eq!(CosmeticCategory::from_prefix("pet"), None);
        assert_eq!(CosmeticCategory::from_prefix(""), None);
        assert_eq!(CosmeticCategory::from_prefix("  "), None);
    }

    #[test]
    fn test_category_case_insensitive() {
        assert_eq!(
            CosmeticCategory::from_prefix("TRAIL"),
            Some(CosmeticCategory::Trail)
        );
    }

    #[test]
    fn test_slot_storage_key_roundtrip() {
        for slot in CosmeticSlot::ALL {
            assert_eq!(CosmeticSlot::from_storage_key(slot.storage_key()), Some(slot));
        }
    }

    #[test]
    fn test_slot_category_mapping_is_total() {
        let suit_slots = CosmeticSlot::ALL
            .into_iter()
            .filter(|slot| slot.category() == CosmeticCategory::Suit)
            .count();
        assert_eq!(suit_slots, SuitSlot::ALL.len());
        assert_eq!(CosmeticSlot::Trail.category(), CosmeticCategory::Trail);
        assert_eq!(CosmeticSlot::Cloak.category(), CosmeticCategory::Cloak);
        assert_eq!(CosmeticSlot::Click.category(), CosmeticCategory::Click);
    }

    #[test]
    fn test_suit_slot_suffix_roundtrip() {
        for slot in SuitSlot::ALL {
            assert_eq!(
                SuitSlot::from_storage_suffix(slot.storage_suffix()),
                Some(slot)
            );
        }
        assert_eq!(SuitSlot::from_storage_suffix("wings"), None);
    }
}
