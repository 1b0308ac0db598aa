//! # Geometry and Instruction Value Types
//!
//! Pure value semantics, no host-platform dependency. These are the only
//! types allowed to cross the worker thread boundary: contexts go out,
//! instructions come back, neither ever mutates after construction.

use crate::ids::{EntityId, WorldId};

/// 8-bit RGB color used for dust payloads, armor tints and rarity display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Immutable 3D vector in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum.
    #[inline]
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference.
    #[inline]
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Uniform scale.
    #[inline]
    #[must_use]
    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Unit-length copy. A vector with zero (or negative-degenerate) length
    /// is returned unchanged rather than producing NaN components.
    #[must_use]
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length <= 0.0 {
            return self;
        }
        Self::new(self.x / length, self.y / length, self.z / length)
    }

    /// Cross product.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared euclidean length. Cheaper than [`Vec3::length`]; the movement
    /// epsilon check uses this.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }
}

/// Immutable per-tick snapshot of an entity, built on the authority thread
/// and handed to workers. Velocity is derived as `current - previous`
/// position by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityContext {
    entity: EntityId,
    world: WorldId,
    position: Vec3,
    velocity: Vec3,
    yaw: f32,
    pitch: f32,
    on_ground: bool,
    epoch_millis: u64,
}

impl EntityContext {
    /// Creates a snapshot. The caller supplies every field; nothing is read
    /// from live state after this point.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        entity: EntityId,
        world: WorldId,
        position: Vec3,
        velocity: Vec3,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
        epoch_millis: u64,
    ) -> Self {
        Self {
            entity,
            world,
            position,
            velocity,
            yaw,
            pitch,
            on_ground,
            epoch_millis,
        }
    }

    /// The snapshotted entity.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// World the entity occupied at snapshot time.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Position at snapshot time.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Per-tick displacement (`current - previous` position).
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Horizontal look angle in degrees.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Vertical look angle in degrees.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Whether the entity stood on solid ground.
    #[must_use]
    pub const fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Wall-clock milliseconds at snapshot time. Cosmetics use this as their
    /// animation clock.
    #[must_use]
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

/// Particle primitives the host can render. The set mirrors what the
/// built-in cosmetics emit; hosts map these onto their own particle system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Small flame.
    Flame,
    /// Soft white puff.
    Cloud,
    /// Tintable dust mote; carries a [`ParticlePayload::Dust`] payload.
    Dust,
    /// Firework spark burst.
    Firework,
    /// Slow-falling bright mote.
    EndRod,
}

/// Typed payload attached to an instruction when the kind requires extra
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticlePayload {
    /// Dust tint and size for [`ParticleKind::Dust`].
    Dust {
        /// Particle color.
        color: Rgb,
        /// Render scale, 1.0 is the host default.
        size: f32,
    },
}

/// Immutable description of one particle emission. Produced off-thread,
/// consumed on the authority thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleInstruction {
    kind: ParticleKind,
    world: WorldId,
    position: Vec3,
    offset: Vec3,
    count: u32,
    extra: f64,
    payload: Option<ParticlePayload>,
    force: bool,
}

impl ParticleInstruction {
    /// Validated construction: a zero count is normalized to 1 and an absent
    /// offset becomes the zero vector.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        kind: ParticleKind,
        world: WorldId,
        position: Vec3,
        offset: Option<Vec3>,
        count: u32,
        extra: f64,
        payload: Option<ParticlePayload>,
        force: bool,
    ) -> Self {
        Self {
            kind,
            world,
            position,
            offset: offset.unwrap_or(Vec3::ZERO),
            count: count.max(1),
            extra,
            payload,
            force,
        }
    }

    /// Convenience constructor for a single trail particle at the context's
    /// position.
    #[must_use]
    pub fn trail(kind: ParticleKind, ctx: &EntityContext, offset: Vec3) -> Self {
        Self::new(
            kind,
            ctx.world(),
            ctx.position(),
            Some(offset),
            1,
            0.0,
            None,
            false,
        )
    }

    /// Particle primitive to render.
    #[must_use]
    pub const fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// World to render in; dropped silently if it no longer exists at flush
    /// time.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Emission origin.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Randomization spread the host applies per particle.
    #[must_use]
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Number of particles, always at least 1.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Kind-specific extra parameter (usually speed).
    #[must_use]
    pub const fn extra(&self) -> f64 {
        self.extra
    }

    /// Typed payload, if the kind carries one.
    #[must_use]
    pub const fn payload(&self) -> Option<ParticlePayload> {
        self.payload
    }

    /// Whether the host should render beyond its normal view distance.
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.add(b), Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b.sub(a), Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a.scale(2.0), Vec3::new(2.0, 4.0, 6.0));
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_is_identity() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vec3::new(0.0, 0.0, 7.5).normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert_eq!(n, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cross_handedness() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_instruction_normalizes_count_and_offset() {
        let instruction = ParticleInstruction::new(
            ParticleKind::Flame,
            WorldId::new(1),
            Vec3::ZERO,
            None,
            0,
            0.0,
            None,
            false,
        );
        assert_eq!(instruction.count(), 1);
        assert_eq!(instruction.offset(), Vec3::ZERO);
    }

    #[test]
    fn test_trail_constructor() {
        let ctx = EntityContext::new(
            EntityId::new(7),
            WorldId::new(2),
            Vec3::new(1.0, 64.0, -3.0),
            Vec3::ZERO,
            0.0,
            0.0,
            true,
            1_000,
        );
        let instruction = ParticleInstruction::trail(ParticleKind::Cloud, &ctx, Vec3::ZERO);
        assert_eq!(instruction.world(), WorldId::new(2));
        assert_eq!(instruction.position(), ctx.position());
        assert_eq!(instruction.count(), 1);
        assert!(!instruction.force());
    }
}
