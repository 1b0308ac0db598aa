//! # Cosmetic Descriptors
//!
//! The immutable identity card of a cosmetic: created once at registration,
//! shared by gameplay and menu display, never mutated. Construction goes
//! through a validating builder so a half-described cosmetic cannot enter
//! the registry.

use thiserror::Error;

use crate::category::CosmeticCategory;
use crate::keys;
use crate::rarity::CosmeticRarity;

/// Error raised when a descriptor is built from incomplete metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// A mandatory field was never supplied or was blank.
    #[error("descriptor field `{0}` is missing or blank")]
    MissingField(&'static str),
}

/// Immutable cosmetic metadata: id, display strings, rarity and icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosmeticDescriptor {
    id: String,
    display_name: String,
    description: String,
    icon: String,
    rarity: CosmeticRarity,
    limited: Option<String>,
}

impl CosmeticDescriptor {
    /// Starts a builder. Id, display name, description, icon and rarity are
    /// mandatory.
    #[must_use]
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// Globally unique id in `category:name` form, normalized.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human friendly name shown in menus.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Long form description used for tooltips.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Showcase icon reference used in menus.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Rarity tier.
    #[must_use]
    pub fn rarity(&self) -> CosmeticRarity {
        self.rarity
    }

    /// Optional limited-edition note injected into tooltips.
    #[must_use]
    pub fn limited(&self) -> Option<&str> {
        self.limited.as_deref()
    }

    /// Category parsed from the id prefix. `None` for ids whose prefix is
    /// not a known category.
    #[must_use]
    pub fn category(&self) -> Option<CosmeticCategory> {
        keys::category_from_id(&self.id)
    }
}

/// Builder for [`CosmeticDescriptor`].
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    id: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    rarity: Option<CosmeticRarity>,
    limited: Option<String>,
}

impl DescriptorBuilder {
    /// Sets the globally unique id (`category:name`). Normalized on build.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the menu display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the tooltip description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the showcase icon reference.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the rarity tier.
    #[must_use]
    pub fn rarity(mut self, rarity: CosmeticRarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    /// Sets the optional limited-edition note. Blank notes are dropped.
    #[must_use]
    pub fn limited(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.limited = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        self
    }

    /// Validates and builds the descriptor.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::MissingField`] if id, display name, description,
    /// icon or rarity is absent or blank.
    pub fn build(self) -> Result<CosmeticDescriptor, DescriptorError> {
        let id = require(self.id, "id")?;
        let display_name = require(self.display_name, "display_name")?;
        let description = require(self.description, "description")?;
        let icon = require(self.icon, "icon")?;
        let rarity = self.rarity.ok_or(DescriptorError::MissingField("rarity"))?;
        Ok(CosmeticDescriptor {
            id: keys::normalize_id(&id),
            display_name,
            description,
            icon,
            rarity,
            limited: self.limited,
        })
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String, DescriptorError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DescriptorError::MissingField(field)),
    }
}
