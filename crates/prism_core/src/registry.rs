//! # Cosmetic Registry
//!
//! A factory keyed by normalized id. The registration table is built once at
//! startup from a static list of constructors; every lookup that misses
//! returns `None` instead of failing, and every `instantiate` call returns a
//! brand new instance.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::cosmetic::Cosmetic;
use crate::descriptor::CosmeticDescriptor;
use crate::keys;

/// Constructor producing a fresh cosmetic instance from its descriptor.
pub type CosmeticCtor = fn(CosmeticDescriptor) -> Cosmetic;

struct Entry {
    descriptor: CosmeticDescriptor,
    ctor: CosmeticCtor,
}

/// Id-keyed cosmetic factory. Populated once at startup, read-only
/// afterwards.
#[derive(Default)]
pub struct CosmeticRegistry {
    entries: HashMap<String, Entry>,
}

impl CosmeticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cosmetic. Duplicate ids keep the first registration and
    /// log a warning; returns whether the entry was accepted.
    pub fn register(&mut self, descriptor: CosmeticDescriptor, ctor: CosmeticCtor) -> bool {
        let id = descriptor.id().to_owned();
        if let Some(existing) = self.entries.get(&id) {
            warn!(
                id,
                kept = existing.descriptor.display_name(),
                rejected = descriptor.display_name(),
                "duplicate cosmetic id, keeping first registration"
            );
            return false;
        }
        self.entries.insert(id, Entry { descriptor, ctor });
        true
    }

    /// Logs a registration summary. Call once after startup population.
    pub fn log_summary(&self) {
        info!(registered = self.entries.len(), "cosmetic registry ready");
    }

    /// Number of registered cosmetics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no cosmetics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a descriptor by id. Unknown ids yield `None`.
    #[must_use]
    pub fn descriptor(&self, id: &str) -> Option<&CosmeticDescriptor> {
        self.entries
            .get(&keys::normalize_id(id))
            .map(|entry| &entry.descriptor)
    }

    /// All registered descriptors, ordered by id for stable menu display.
    #[must_use]
    pub fn descriptors(&self) -> Vec<&CosmeticDescriptor> {
        let mut descriptors: Vec<&CosmeticDescriptor> =
            self.entries.values().map(|entry| &entry.descriptor).collect();
        descriptors.sort_by_key(|descriptor| descriptor.id());
        descriptors
    }

    /// Produces a fresh instance for an id. Unknown ids yield `None`, never
    /// a panic.
    #[must_use]
    pub fn instantiate(&self, id: &str) -> Option<Cosmetic> {
        let entry = self.entries.get(&keys::normalize_id(id))?;
        Some((entry.ctor)(entry.descriptor.clone()))
    }

    /// Like [`CosmeticRegistry::instantiate`], but also resolves suit piece
    /// keys (`suit:phoenix:head`) to their set (`suit:phoenix`).
    #[must_use]
    pub fn instantiate_from_flat_key(&self, flat_key: &str) -> Option<Cosmetic> {
        let normalized = keys::normalize_id(flat_key);
        if let Some(cosmetic) = self.instantiate(&normalized) {
            return Some(cosmetic);
        }
        let set_id = keys::set_id_from_piece_key(&normalized)?;
        self.instantiate(&set_id)
    }
}
