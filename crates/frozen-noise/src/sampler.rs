//! Sampling noise at integer block positions.

use glam::IVec3;

use crate::improved::ImprovedNoise;

/// Height used for the vertical coordinate when `use_y` is off.
pub const FLAT_SAMPLE_Y: f64 = 64.0;

/// Sample `noise` at a block position scaled by `multiplier`.
///
/// With `use_y` off the vertical coordinate is pinned to [`FLAT_SAMPLE_Y`] so the
/// result only varies over the horizontal plane. With `use_y` on, `multiply_y`
/// decides whether the height is scaled along with `x` and `z`.
pub fn sample_at(
    noise: &ImprovedNoise,
    pos: IVec3,
    multiplier: f64,
    multiply_y: bool,
    use_y: bool,
) -> f64 {
    let x = f64::from(pos.x) * multiplier;
    let z = f64::from(pos.z) * multiplier;
    let y = match (use_y, multiply_y) {
        (true, true) => f64::from(pos.y) * multiplier,
        (true, false) => f64::from(pos.y),
        (false, _) => FLAT_SAMPLE_Y,
    };
    noise.noise(x, y, z)
}

/// Absolute value of [`sample_at`].
pub fn sample_abs_at(
    noise: &ImprovedNoise,
    pos: IVec3,
    multiplier: f64,
    multiply_y: bool,
    use_y: bool,
) -> f64 {
    sample_at(noise, pos, multiplier, multiply_y, use_y).abs()
}
