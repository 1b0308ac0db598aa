//! # Cloak Cosmetics
//!
//! Pattern cloaks render a small bitmap anchored to the owner's back while
//! they stand idle. The bitmap rows and the palette mapping cell values to
//! particles are static data per cloak.

use std::sync::Arc;

use prism_core::{
    CloakEffect, Cosmetic, CosmeticDescriptor, CosmeticError, CosmeticRarity, DescriptorError,
    EntityContext, ParticleInstruction, ParticleKind, ParticlePayload, Rgb, Vec3,
};

/// One renderable cell of a cloak pattern.
#[derive(Clone, Copy, Debug)]
pub struct Pixel {
    /// Particle primitive.
    pub kind: ParticleKind,
    /// Typed payload, if the kind needs one.
    pub payload: Option<ParticlePayload>,
    /// Extra world-space nudge applied after pattern placement.
    pub offset: Vec3,
    /// Particles per cell, at least 1.
    pub count: u32,
    /// Kind-specific extra parameter.
    pub extra: f64,
    /// Render beyond normal view distance.
    pub force: bool,
}

impl Pixel {
    /// A single plain particle.
    #[must_use]
    pub const fn of(kind: ParticleKind) -> Self {
        Self {
            kind,
            payload: None,
            offset: Vec3::ZERO,
            count: 1,
            extra: 0.0,
            force: false,
        }
    }

    /// A single tinted dust mote.
    #[must_use]
    pub const fn of_dust(color: Rgb, size: f32) -> Self {
        Self {
            kind: ParticleKind::Dust,
            payload: Some(ParticlePayload::Dust { color, size }),
            offset: Vec3::ZERO,
            count: 1,
            extra: 0.0,
            force: false,
        }
    }
}

/// Base for cloaks that render a bitmap anchored to the owner's back.
///
/// The pattern is row-major, row 0 at the top. Cell values index into the
/// palette; cells without a palette entry stay empty. A degenerate pattern
/// (no rows, or no palette hits) simply renders nothing.
pub struct PatternCloak {
    descriptor: CosmeticDescriptor,
    pattern: &'static [&'static [u8]],
    palette: &'static [(u8, Pixel)],
    horizontal_spacing: f64,
    vertical_spacing: f64,
    depth_offset: f64,
    anchor_height: f64,
}

impl PatternCloak {
    /// Creates a pattern cloak spanning `width_blocks` x `height_blocks`,
    /// floating `depth_offset` behind the owner at `anchor_height`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(
        descriptor: CosmeticDescriptor,
        pattern: &'static [&'static [u8]],
        palette: &'static [(u8, Pixel)],
        width_blocks: f64,
        height_blocks: f64,
        depth_offset: f64,
        anchor_height: f64,
    ) -> Self {
        let width = pattern.first().map_or(0, |row| row.len());
        let height = pattern.len();
        Self {
            descriptor,
            pattern,
            palette,
            horizontal_spacing: if width <= 1 {
                0.0
            } else {
                width_blocks / (width - 1) as f64
            },
            vertical_spacing: if height <= 1 {
                0.0
            } else {
                height_blocks / (height - 1) as f64
            },
            depth_offset,
            anchor_height,
        }
    }

    fn pixel(&self, value: u8) -> Option<Pixel> {
        self.palette
            .iter()
            .find(|(key, _)| *key == value)
            .map(|(_, pixel)| *pixel)
    }
}

const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

impl CloakEffect for PatternCloak {
    fn descriptor(&self) -> &CosmeticDescriptor {
        &self.descriptor
    }

    #[allow(clippy::cast_precision_loss)]
    fn tick(&self, ctx: &EntityContext) -> Result<Vec<ParticleInstruction>, CosmeticError> {
        let height = self.pattern.len();
        let width = self.pattern.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Ok(Vec::new());
        }
        let half_width = (width - 1) as f64 / 2.0;
        let half_height = (height - 1) as f64 / 2.0;

        let yaw_radians = f64::from(ctx.yaw()).to_radians();
        let forward = Vec3::new(-yaw_radians.sin(), 0.0, yaw_radians.cos()).normalize();
        let back = forward.scale(-1.0);
        let right = Vec3::new(-back.z, 0.0, back.x).normalize();
        let anchor = ctx
            .position()
            .add(back.scale(self.depth_offset))
            .add(Vec3::new(0.0, self.anchor_height, 0.0));

        let time = ctx.epoch_millis() as f64 * 0.004;
        let flutter = time.sin() * 0.05;

        let mut instructions = Vec::new();
        for (row, cells) in self.pattern.iter().enumerate() {
            let vertical_offset = (half_height - row as f64) * self.vertical_spacing;
            for (column, value) in cells.iter().enumerate() {
                let Some(pixel) = self.pixel(*value) else {
                    continue;
                };
                let horizontal_offset = (column as f64 - half_width) * self.horizontal_spacing;
                let offset = right
                    .scale(horizontal_offset)
                    .add(UP.scale(vertical_offset))
                    .add(back.scale(flutter));
                instructions.push(ParticleInstruction::new(
                    pixel.kind,
                    ctx.world(),
                    anchor.add(offset).add(pixel.offset),
                    None,
                    pixel.count,
                    pixel.extra,
                    pixel.payload,
                    pixel.force,
                ));
            }
        }
        Ok(instructions)
    }
}

/// Luminous angel wing bitmap, row 0 at the top.
const ANGEL_WING_PATTERN: &[&[u8]] = &[
    &[0, 1, 2, 2, 2, 1, 0],
    &[1, 2, 2, 3, 2, 2, 1],
    &[1, 2, 3, 3, 3, 2, 1],
    &[1, 2, 3, 3, 3, 2, 1],
    &[0, 1, 2, 3, 2, 1, 0],
    &[0, 0, 1, 2, 1, 0, 0],
    &[0, 0, 0, 1, 0, 0, 0],
];

const ANGEL_WING_PALETTE: &[(u8, Pixel)] = &[
    (1, Pixel::of(ParticleKind::Cloud)),
    (2, Pixel::of_dust(Rgb::new(240, 248, 255), 1.0)),
    (3, Pixel::of_dust(Rgb::new(120, 200, 255), 1.2)),
];

/// Descriptor for the angel wings cloak.
///
/// # Errors
///
/// Propagates [`DescriptorError`] from the builder.
pub fn angel_wings_descriptor() -> Result<CosmeticDescriptor, DescriptorError> {
    CosmeticDescriptor::builder()
        .id("cloak:angel_wings")
        .display_name("Angel Wings")
        .description("Radiant wings shimmer gently when you stand idle.")
        .icon("feather")
        .rarity(CosmeticRarity::Legendary)
        .limited("Seasonal prototype reward")
        .build()
}

/// Registry constructor for the angel wings cloak.
#[must_use]
pub fn angel_wings(descriptor: CosmeticDescriptor) -> Cosmetic {
    Cosmetic::Cloak(Arc::new(PatternCloak::new(
        descriptor,
        ANGEL_WING_PATTERN,
        ANGEL_WING_PALETTE,
        3.0,
        3.0,
        0.45,
        1.25,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{EntityId, WorldId};

    fn ctx(yaw: f32) -> EntityContext {
        EntityContext::new(
            EntityId::new(5),
            WorldId::new(1),
            Vec3::new(0.0, 70.0, 0.0),
            Vec3::ZERO,
            yaw,
            0.0,
            true,
            2_000,
        )
    }

    fn wings() -> PatternCloak {
        PatternCloak::new(
            angel_wings_descriptor().unwrap(),
            ANGEL_WING_PATTERN,
            ANGEL_WING_PALETTE,
            3.0,
            3.0,
            0.45,
            1.25,
        )
    }

    #[test]
    fn test_renders_only_palette_cells() {
        let populated: usize = ANGEL_WING_PATTERN
            .iter()
            .map(|row| row.iter().filter(|value| **value != 0).count())
            .sum();
        let instructions = wings().tick(&ctx(0.0)).unwrap();
        assert_eq!(instructions.len(), populated);
    }

    #[test]
    fn test_dust_cells_carry_payload() {
        let instructions = wings().tick(&ctx(0.0)).unwrap();
        for instruction in &instructions {
            match instruction.kind() {
                ParticleKind::Dust => assert!(matches!(
                    instruction.payload(),
                    Some(ParticlePayload::Dust { .. })
                )),
                ParticleKind::Cloud => assert!(instruction.payload().is_none()),
                other => panic!("unexpected particle kind {other:?}"),
            }
        }
    }

    #[test]
    fn test_anchor_sits_behind_owner() {
        // Yaw 0 faces +Z, so "back" is -Z and every cell must sit there.
        let instructions = wings().tick(&ctx(0.0)).unwrap();
        for instruction in &instructions {
            assert!(instruction.position().z < 0.0);
        }
    }

    #[test]
    fn test_empty_pattern_renders_nothing() {
        static EMPTY: &[&[u8]] = &[];
        let cloak = PatternCloak::new(
            angel_wings_descriptor().unwrap(),
            EMPTY,
            ANGEL_WING_PALETTE,
            3.0,
            3.0,
            0.45,
            1.25,
        );
        assert!(cloak.tick(&ctx(0.0)).unwrap().is_empty());
    }
}
