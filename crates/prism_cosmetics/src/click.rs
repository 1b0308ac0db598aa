//! # Click Cosmetics

use std::sync::Arc;

use prism_core::{
    ClickEffect, Cosmetic, CosmeticDescriptor, CosmeticError, CosmeticRarity, DescriptorError,
    EntityContext, EntityId, ParticleInstruction, ParticleKind, Vec3,
};

/// Descriptor for [`SparkBurstClick`].
///
/// # Errors
///
/// Propagates [`DescriptorError`] from the builder.
pub fn spark_burst_descriptor() -> Result<CosmeticDescriptor, DescriptorError> {
    CosmeticDescriptor::builder()
        .id("click:spark_burst")
        .display_name("Spark Burst")
        .description("Firework sparks erupt whenever someone greets you.")
        .icon("firework_rocket")
        .rarity(CosmeticRarity::Rare)
        .build()
}

/// Registry constructor for [`SparkBurstClick`].
#[must_use]
pub fn spark_burst(descriptor: CosmeticDescriptor) -> Cosmetic {
    Cosmetic::Click(Arc::new(SparkBurstClick { descriptor }))
}

/// Celebratory spark burst above the owner's head when clicked.
pub struct SparkBurstClick {
    descriptor: CosmeticDescriptor,
}

impl ClickEffect for SparkBurstClick {
    fn descriptor(&self) -> &CosmeticDescriptor {
        &self.descriptor
    }

    fn on_click(
        &self,
        owner: &EntityContext,
        _clicker: EntityId,
    ) -> Result<Vec<ParticleInstruction>, CosmeticError> {
        let origin = owner.position().add(Vec3::new(0.0, 1.2, 0.0));
        Ok(vec![ParticleInstruction::new(
            ParticleKind::Firework,
            owner.world(),
            origin,
            Some(Vec3::new(0.3, 0.4, 0.3)),
            35,
            0.02,
            None,
            false,
        )])
    }
}
