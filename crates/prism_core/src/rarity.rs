//! # Rarity Tiers
//!
//! Ordered rarity ladder used for menu display and for resolving
//! highest-rank ties in outer systems. The runtime itself never branches on
//! rarity.

use crate::geometry::Rgb;

/// Ordered rarity tiers. Derived `Ord` follows declaration order, lowest
/// first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CosmeticRarity {
    /// Baseline tier.
    Common,
    /// Slightly harder to obtain.
    Uncommon,
    /// Rare drops and milestone rewards.
    Rare,
    /// Flagship seasonal rewards.
    Epic,
    /// Top of the regular ladder.
    Legendary,
    /// Promotional one-offs outside the ladder.
    Special,
    /// Staff-only.
    Admin,
}

impl CosmeticRarity {
    /// All rarities, lowest tier first.
    pub const ALL: [Self; 7] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Special,
        Self::Admin,
    ];

    /// Uppercase label used in tooltips.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::Uncommon => "UNCOMMON",
            Self::Rare => "RARE",
            Self::Epic => "EPIC",
            Self::Legendary => "LEGENDARY",
            Self::Special => "SPECIAL",
            Self::Admin => "ADMIN",
        }
    }

    /// Base display color for the tier.
    #[must_use]
    pub const fn base_color(self) -> Rgb {
        match self {
            Self::Common => Rgb::new(255, 255, 255),
            Self::Uncommon => Rgb::new(0, 170, 170),
            Self::Rare => Rgb::new(85, 85, 255),
            Self::Epic => Rgb::new(170, 0, 170),
            Self::Legendary => Rgb::new(255, 170, 0),
            Self::Special => Rgb::new(255, 85, 255),
            Self::Admin => Rgb::new(255, 85, 85),
        }
    }

    /// Numeric rank used when outer systems resolve "highest configured
    /// rank" ties.
    #[must_use]
    pub const fn progression_rank(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarities_are_totally_ordered() {
        for pair in CosmeticRarity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].progression_rank() < pair[1].progression_rank());
        }
    }

    #[test]
    fn test_rank_matches_ladder_position() {
        assert_eq!(CosmeticRarity::Common.progression_rank(), 0);
        assert_eq!(CosmeticRarity::Admin.progression_rank(), 6);
    }
}
