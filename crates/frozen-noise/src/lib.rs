//! Deterministic seeded noise for FrozenLib.
//!
//! [`NoiseField`] owns one improved-noise generator per [`NoiseVariant`], all
//! seeded together and swapped atomically on reseed. The random sources used to
//! draw the lattices are exposed as well, since features and tests use them as
//! reproducible per-invocation generators.

mod field;
mod improved;
mod random;
mod sampler;

pub use field::{NoiseBundle, NoiseField, NoiseVariant, NoiseVariantError, SeedAlgorithm};
pub use improved::ImprovedNoise;
pub use random::{LegacyRandom, RandomSource, XoroshiroRandom};
pub use sampler::{FLAT_SAMPLE_Y, sample_abs_at, sample_at};
