//! # Trail Cosmetics

use std::f64::consts::PI;
use std::sync::Arc;

use prism_core::{
    Cosmetic, CosmeticDescriptor, CosmeticError, CosmeticRarity, DescriptorError, EntityContext,
    ParticleInstruction, ParticleKind, TrailEffect, Vec3,
};

/// Descriptor for [`EmberHelixTrail`].
///
/// # Errors
///
/// Propagates [`DescriptorError`] from the builder.
pub fn ember_helix_descriptor() -> Result<CosmeticDescriptor, DescriptorError> {
    CosmeticDescriptor::builder()
        .id("trail:ember_helix")
        .display_name("Ember Helix")
        .description("Twin spirals of embers orbit your steps.")
        .icon("blaze_powder")
        .rarity(CosmeticRarity::Epic)
        .build()
}

/// Registry constructor for [`EmberHelixTrail`].
#[must_use]
pub fn ember_helix(descriptor: CosmeticDescriptor) -> Cosmetic {
    Cosmetic::Trail(Arc::new(EmberHelixTrail { descriptor }))
}

/// Emits counter-rotating flame helixes around the owner.
pub struct EmberHelixTrail {
    descriptor: CosmeticDescriptor,
}

impl TrailEffect for EmberHelixTrail {
    fn descriptor(&self) -> &CosmeticDescriptor {
        &self.descriptor
    }

    #[allow(clippy::cast_precision_loss)]
    fn tick(&self, ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError> {
        let time = ctx.epoch_millis() as f64 * 0.004;
        let radius = 0.6;
        let vertical_oscillation = time.sin() * 0.1;
        let origin = ctx.position().add(Vec3::new(0.0, 0.2, 0.0));

        let mut instructions = Vec::with_capacity(2);
        for i in 0..2_u32 {
            let angle = time * 2.0 + PI * f64::from(i);
            let sign = if i == 0 { 1.0 } else { -1.0 };
            let offset = Vec3::new(
                angle.cos() * radius,
                0.2 + vertical_oscillation * sign,
                angle.sin() * radius,
            );
            instructions.push(ParticleInstruction::new(
                ParticleKind::Flame,
                ctx.world(),
                origin.add(offset),
                Some(Vec3::new(0.0, 0.02, 0.0)),
                2,
                0.0,
                None,
                false,
            ));
        }
        Ok(instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{EntityId, WorldId};

    fn ctx(epoch_millis: u64) -> EntityContext {
        EntityContext::new(
            EntityId::new(1),
            WorldId::new(3),
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::new(0.2, 0.0, 0.0),
            0.0,
            0.0,
            true,
            epoch_millis,
        )
    }

    #[test]
    fn test_emits_two_helix_arms() {
        let trail = EmberHelixTrail {
            descriptor: ember_helix_descriptor().unwrap(),
        };
        let instructions = trail.tick(&ctx(10_000)).unwrap();
        assert_eq!(instructions.len(), 2);
        for instruction in &instructions {
            assert_eq!(instruction.kind(), ParticleKind::Flame);
            assert_eq!(instruction.world(), WorldId::new(3));
            assert_eq!(instruction.count(), 2);
            // Arms stay within the helix radius of the origin column.
            let delta = instruction.position().sub(Vec3::new(0.0, 64.0, 0.0));
            assert!(delta.x.abs() <= 0.6 + 1e-9);
            assert!(delta.z.abs() <= 0.6 + 1e-9);
        }
    }

    #[test]
    fn test_arms_are_counter_phased() {
        let trail = EmberHelixTrail {
            descriptor: ember_helix_descriptor().unwrap(),
        };
        let instructions = trail.tick(&ctx(10_000)).unwrap();
        let a = instructions[0].position();
        let b = instructions[1].position();
        // PI phase difference mirrors the arms through the origin column.
        assert!((a.x + b.x).abs() < 1e-9);
        assert!((a.z + b.z).abs() < 1e-9);
    }

    #[test]
    fn test_default_trigger_gates_on_movement() {
        let trail = EmberHelixTrail {
            descriptor: ember_helix_descriptor().unwrap(),
        };
        let mut still = ctx(0);
        still = EntityContext::new(
            still.entity(),
            still.world(),
            still.position(),
            Vec3::ZERO,
            0.0,
            0.0,
            true,
            0,
        );
        assert!(!trail.should_trigger(&still));
        assert!(trail.should_trigger(&ctx(0)));
    }
}
