//! Seedable random sources with the game's bit-exact output sequences.
//!
//! [`LegacyRandom`] is the 48-bit linear congruential generator used by the
//! legacy, single-threaded and thread-safe sources; [`XoroshiroRandom`] is
//! Xoroshiro128++ with the game's 64-to-128-bit seed upgrade. Both also implement
//! [`rand::RngCore`] and [`rand::SeedableRng`], so they can drive any
//! `rand::Rng` consumer.

use rand::{RngCore, SeedableRng};

/// `2^-24`, the spacing of `next_float` outputs.
const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;
/// `2^-53`, the spacing of `next_double` outputs.
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Minimal random-source interface used to build noise lattices.
pub trait RandomSource {
    /// Reset the generator state from a 64-bit seed.
    fn set_seed(&mut self, seed: i64);
    /// Uniform `i32` over the whole range.
    fn next_int(&mut self) -> i32;
    /// Uniform `i32` in `[0, bound)`.
    ///
    /// # Panics
    /// Panics if `bound <= 0`.
    fn next_int_bounded(&mut self, bound: i32) -> i32;
    /// Uniform `i64` over the whole range.
    fn next_long(&mut self) -> i64;
    /// Fair coin flip.
    fn next_boolean(&mut self) -> bool;
    /// Uniform `f32` in `[0, 1)`.
    fn next_float(&mut self) -> f32;
    /// Uniform `f64` in `[0, 1)`.
    fn next_double(&mut self) -> f64;
}

// ---------------------------------------------------------------------------
// Legacy LCG
// ---------------------------------------------------------------------------

const LCG_MULTIPLIER: i64 = 0x5_DEEC_E66D;
const LCG_INCREMENT: i64 = 0xB;
const LCG_MASK: i64 = (1 << 48) - 1;

/// 48-bit linear congruential generator (`java.util.Random` compatible).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyRandom {
    seed: i64,
}

impl LegacyRandom {
    /// Create a generator from a 64-bit seed.
    pub fn new(seed: i64) -> Self {
        Self {
            seed: scramble(seed),
        }
    }

    fn next(&mut self, bits: u32) -> i32 {
        self.seed = self
            .seed
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

fn scramble(seed: i64) -> i64 {
    (seed ^ LCG_MULTIPLIER) & LCG_MASK
}

impl RandomSource for LegacyRandom {
    fn set_seed(&mut self, seed: i64) {
        self.seed = scramble(seed);
    }

    fn next_int(&mut self) -> i32 {
        self.next(32)
    }

    fn next_int_bounded(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive, got {bound}");
        if bound & (bound - 1) == 0 {
            return ((i64::from(bound) * i64::from(self.next(31))) >> 31) as i32;
        }
        loop {
            let bits = self.next(31);
            let value = bits % bound;
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    fn next_long(&mut self) -> i64 {
        let high = i64::from(self.next(32)) << 32;
        high.wrapping_add(i64::from(self.next(32)))
    }

    fn next_boolean(&mut self) -> bool {
        self.next(1) != 0
    }

    fn next_float(&mut self) -> f32 {
        self.next(24) as f32 * FLOAT_UNIT
    }

    fn next_double(&mut self) -> f64 {
        let high = i64::from(self.next(26)) << 27;
        let low = i64::from(self.next(27));
        (high + low) as f64 * DOUBLE_UNIT
    }
}

// ---------------------------------------------------------------------------
// Xoroshiro128++
// ---------------------------------------------------------------------------

const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

fn mix_stafford13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Expand a 64-bit seed into the two mixed state words.
fn upgrade_seed(seed: i64) -> (u64, u64) {
    let lo = (seed as u64) ^ SILVER_RATIO_64;
    let hi = lo.wrapping_add(GOLDEN_RATIO_64);
    (mix_stafford13(lo), mix_stafford13(hi))
}

/// Xoroshiro128++ generator seeded through the stafford13 seed upgrade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XoroshiroRandom {
    lo: u64,
    hi: u64,
}

impl XoroshiroRandom {
    /// Create a generator from a 64-bit seed.
    pub fn new(seed: i64) -> Self {
        let (lo, hi) = upgrade_seed(seed);
        Self::from_state(lo, hi)
    }

    /// Create a generator from raw state words. An all-zero state is replaced by
    /// the golden/silver ratio constants.
    pub fn from_state(lo: u64, hi: u64) -> Self {
        if lo == 0 && hi == 0 {
            return Self {
                lo: GOLDEN_RATIO_64,
                hi: SILVER_RATIO_64,
            };
        }
        Self { lo, hi }
    }

    fn next_bits(&mut self, bits: u32) -> u64 {
        (self.next_long() as u64) >> (64 - bits)
    }
}

impl RandomSource for XoroshiroRandom {
    fn set_seed(&mut self, seed: i64) {
        *self = Self::new(seed);
    }

    fn next_int(&mut self) -> i32 {
        self.next_long() as i32
    }

    fn next_int_bounded(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive, got {bound}");
        let bound = u64::from(bound as u32);
        let mut product = u64::from(self.next_int() as u32) * bound;
        let mut low = product & 0xFFFF_FFFF;
        if low < bound {
            let threshold = u64::from((bound as u32).wrapping_neg() % bound as u32);
            while low < threshold {
                product = u64::from(self.next_int() as u32) * bound;
                low = product & 0xFFFF_FFFF;
            }
        }
        (product >> 32) as i32
    }

    fn next_long(&mut self) -> i64 {
        let lo = self.lo;
        let mut hi = self.hi;
        let result = lo.wrapping_add(hi).rotate_left(17).wrapping_add(lo);
        hi ^= lo;
        self.lo = lo.rotate_left(49) ^ hi ^ (hi << 21);
        self.hi = hi.rotate_left(28);
        result as i64
    }

    fn next_boolean(&mut self) -> bool {
        self.next_long() & 1 != 0
    }

    fn next_float(&mut self) -> f32 {
        self.next_bits(24) as f32 * FLOAT_UNIT
    }

    fn next_double(&mut self) -> f64 {
        self.next_bits(53) as f64 * DOUBLE_UNIT
    }
}

// ---------------------------------------------------------------------------
// rand interop
// ---------------------------------------------------------------------------

fn fill_from_longs(source: &mut impl RandomSource, dst: &mut [u8]) {
    for chunk in dst.chunks_mut(8) {
        let bytes = source.next_long().to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

impl RngCore for LegacyRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_int() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_long() as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_from_longs(self, dst);
    }
}

impl SeedableRng for LegacyRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}

impl RngCore for XoroshiroRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_int() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_long() as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_from_longs(self, dst);
    }
}

impl SeedableRng for XoroshiroRandom {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&seed[..8]);
        hi.copy_from_slice(&seed[8..]);
        Self::from_state(u64::from_le_bytes(lo), u64::from_le_bytes(hi))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as i64)
    }
}
