//! Seed-synchronized noise generators with atomic reseeding.
//!
//! A [`NoiseBundle`] holds one [`ImprovedNoise`] per [`NoiseVariant`], all built
//! from the same seed. [`NoiseField`] owns the current bundle behind a pointer
//! that is replaced in a single step on reseed, so a reader that takes a
//! [`NoiseField::snapshot`] always sees every variant on the same seed.

use std::sync::{Arc, PoisonError, RwLock};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::improved::ImprovedNoise;
use crate::random::{LegacyRandom, XoroshiroRandom};

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Algorithm used to draw the lattice of a noise generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeedAlgorithm {
    /// 48-bit linear congruential generator.
    Legacy,
    /// Xoroshiro128++ with the stafford13 seed upgrade.
    Xoroshiro,
}

/// Selectable noise generator. Serialized as its selector number (1..=4).
///
/// The three legacy selectors build the same immutable lattice from a seed;
/// they stay distinct so existing configs keep their numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NoiseVariant {
    /// Legacy LCG lattice (selector 1).
    Local,
    /// Legacy LCG lattice (selector 2).
    Checked,
    /// Legacy LCG lattice (selector 3).
    ThreadSafe,
    /// Xoroshiro lattice (selector 4). Drives the wind field.
    #[default]
    Xoroshiro,
}

/// Rejected noise selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("noise selector must be in 1..=4, got {0}")]
pub struct NoiseVariantError(pub u8);

impl NoiseVariant {
    /// Every variant, in selector order.
    pub const ALL: [NoiseVariant; 4] = [
        NoiseVariant::Local,
        NoiseVariant::Checked,
        NoiseVariant::ThreadSafe,
        NoiseVariant::Xoroshiro,
    ];

    /// The lattice seeding algorithm for this variant.
    pub fn seed_algorithm(self) -> SeedAlgorithm {
        match self {
            NoiseVariant::Local | NoiseVariant::Checked | NoiseVariant::ThreadSafe => {
                SeedAlgorithm::Legacy
            }
            NoiseVariant::Xoroshiro => SeedAlgorithm::Xoroshiro,
        }
    }

    /// The selector number used in feature configurations.
    pub fn selector(self) -> u8 {
        match self {
            NoiseVariant::Local => 1,
            NoiseVariant::Checked => 2,
            NoiseVariant::ThreadSafe => 3,
            NoiseVariant::Xoroshiro => 4,
        }
    }

    fn index(self) -> usize {
        usize::from(self.selector() - 1)
    }
}

impl TryFrom<u8> for NoiseVariant {
    type Error = NoiseVariantError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NoiseVariant::Local),
            2 => Ok(NoiseVariant::Checked),
            3 => Ok(NoiseVariant::ThreadSafe),
            4 => Ok(NoiseVariant::Xoroshiro),
            other => Err(NoiseVariantError(other)),
        }
    }
}

impl From<NoiseVariant> for u8 {
    fn from(variant: NoiseVariant) -> Self {
        variant.selector()
    }
}

fn build_generator(algorithm: SeedAlgorithm, seed: i64) -> ImprovedNoise {
    match algorithm {
        SeedAlgorithm::Legacy => ImprovedNoise::new(&mut LegacyRandom::new(seed)),
        SeedAlgorithm::Xoroshiro => ImprovedNoise::new(&mut XoroshiroRandom::new(seed)),
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// One generator per variant, all derived from the same seed.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBundle {
    seed: i64,
    generators: [ImprovedNoise; 4],
}

impl NoiseBundle {
    /// Build every variant from `seed`.
    pub fn new(seed: i64) -> Self {
        let generators =
            NoiseVariant::ALL.map(|variant| build_generator(variant.seed_algorithm(), seed));
        debug!(seed, "built noise bundle");
        Self { seed, generators }
    }

    /// The seed shared by every generator in the bundle.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// The generator for `variant`.
    pub fn generator(&self, variant: NoiseVariant) -> &ImprovedNoise {
        &self.generators[variant.index()]
    }

    /// Sample `variant` at `(x, y, z)`.
    pub fn sample(&self, variant: NoiseVariant, x: f64, y: f64, z: f64) -> f64 {
        self.generator(variant).noise(x, y, z)
    }

    /// Axis-isolated sample: `(noise(x, 0, 0), noise(0, y, 0), noise(0, 0, z))`.
    pub fn sample_vec3(&self, variant: NoiseVariant, x: f64, y: f64, z: f64) -> DVec3 {
        let noise = self.generator(variant);
        DVec3::new(
            noise.noise(x, 0.0, 0.0),
            noise.noise(0.0, y, 0.0),
            noise.noise(0.0, 0.0, z),
        )
    }
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// Owner of the current [`NoiseBundle`]. Share it behind an `Arc`; every method
/// takes `&self`.
#[derive(Debug)]
pub struct NoiseField {
    current: RwLock<Arc<NoiseBundle>>,
}

impl NoiseField {
    /// Create a field seeded with `seed`.
    pub fn new(seed: i64) -> Self {
        Self {
            current: RwLock::new(Arc::new(NoiseBundle::new(seed))),
        }
    }

    /// A consistent view of every generator. Prefer this over repeated
    /// [`sample`](Self::sample) calls when taking many samples.
    pub fn snapshot(&self) -> Arc<NoiseBundle> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// The current seed.
    pub fn seed(&self) -> i64 {
        self.snapshot().seed()
    }

    /// Replace every generator with ones built from `seed`.
    ///
    /// Returns `false` without rebuilding anything when `seed` is already the
    /// current seed.
    pub fn set_seed(&self, seed: i64) -> bool {
        if self.snapshot().seed() == seed {
            return false;
        }
        let fresh = Arc::new(NoiseBundle::new(seed));
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.seed() == seed {
            return false;
        }
        let previous = guard.seed();
        *guard = fresh;
        info!(previous, seed, "noise field reseeded");
        true
    }

    /// Sample `variant` at `(x, y, z)` on the current bundle.
    pub fn sample(&self, variant: NoiseVariant, x: f64, y: f64, z: f64) -> f64 {
        self.snapshot().sample(variant, x, y, z)
    }

    /// Axis-isolated vector sample on the current bundle.
    pub fn sample_vec3(&self, variant: NoiseVariant, x: f64, y: f64, z: f64) -> DVec3 {
        self.snapshot().sample_vec3(variant, x, y, z)
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(0)
    }
}
