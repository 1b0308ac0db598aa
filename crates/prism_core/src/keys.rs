//! # Key Normalization
//!
//! Cosmetic ids take the form `category:name` (`trail:ember_helix`). Suit
//! piece keys carry a third segment naming the armor slot
//! (`suit:phoenix:head`); the first two segments form the set id
//! (`suit:phoenix`). All helpers are pure: malformed input yields `None`.

use crate::category::{CosmeticCategory, SuitSlot};

/// Normalizes a raw id: trimmed and lowercased.
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Extracts the category from an id by splitting on the first `:`.
/// Ids without a `:` or with an empty prefix yield `None`.
#[must_use]
pub fn category_from_id(id: &str) -> Option<CosmeticCategory> {
    let (prefix, _) = id.split_once(':')?;
    if prefix.is_empty() {
        return None;
    }
    CosmeticCategory::from_prefix(prefix)
}

/// Extracts the set id from a suit piece key:
/// `suit:phoenix:head` -> `suit:phoenix`. Keys with fewer than three
/// segments, or whose first segment is not `suit`, yield `None`.
#[must_use]
pub fn set_id_from_piece_key(flat_key: &str) -> Option<String> {
    let parts: Vec<&str> = flat_key.split(':').collect();
    if parts.len() < 3 {
        return None;
    }
    if !parts[0].eq_ignore_ascii_case(CosmeticCategory::Suit.prefix()) {
        return None;
    }
    Some(format!(
        "{}:{}",
        parts[0].to_ascii_lowercase(),
        parts[1].to_ascii_lowercase()
    ))
}

/// Extracts the suit slot from a piece key's third segment.
#[must_use]
pub fn suit_slot_from_piece_key(flat_key: &str) -> Option<SuitSlot> {
    let parts: Vec<&str> = flat_key.split(':').collect();
    if parts.len() < 3 {
        return None;
    }
    SuitSlot::from_storage_suffix(parts[2])
}

/// Builds the piece key for one slot of a suit set:
/// (`suit:phoenix`, helmet) -> `suit:phoenix:head`.
#[must_use]
pub fn suit_piece_key(set_id: &str, slot: SuitSlot) -> String {
    format!("{}:{}", normalize_id(set_id), slot.storage_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_id("  Trail:Ember_Helix "), "trail:ember_helix");
    }

    #[test]
    fn test_category_from_id() {
        assert_eq!(
            category_from_id("trail:ember_helix"),
            Some(CosmeticCategory::Trail)
        );
        assert_eq!(category_from_id("pet:parrot"), None);
        assert_eq!(category_from_id(":oops"), None);
        assert_eq!(category_from_id("no_separator"), None);
    }

    #[test]
    fn test_set_id_from_piece_key() {
        assert_eq!(
            set_id_from_piece_key("suit:phoenix:head").as_deref(),
            Some("suit:phoenix")
        );
        assert_eq!(
            set_id_from_piece_key("SUIT:Phoenix:boots").as_deref(),
            Some("suit:phoenix")
        );
        assert_eq!(set_id_from_piece_key("suit:phoenix"), None);
        assert_eq!(set_id_from_piece_key("trail:ember:head"), None);
    }

    #[test]
    fn test_suit_slot_from_piece_key() {
        assert_eq!(
            suit_slot_from_piece_key("suit:phoenix:head"),
            Some(SuitSlot::Helmet)
        );
        assert_eq!(suit_slot_from_piece_key("suit:phoenix:wings"), None);
        assert_eq!(suit_slot_from_piece_key("suit:phoenix"), None);
    }

    #[test]
    fn test_piece_key_roundtrip() {
        for slot in SuitSlot::ALL {
            let key = suit_piece_key("Suit:Phoenix", slot);
            assert_eq!(set_id_from_piece_key(&key).as_deref(), Some("suit:phoenix"));
            assert_eq!(suit_slot_from_piece_key(&key), Some(slot));
        }
    }
}
