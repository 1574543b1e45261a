//! Keyframe easing curves.
//!
//! Every curve maps an input `x` between two keyframes `a` and `b` onto an output
//! value. Before `a.x` the output is `0`, after `b.x` it is `b.y`, and in between it
//! is `b.y` scaled by the curve evaluated at the normalized position
//! `t = (x - a.x) / (b.x - a.x)`.

use std::f32::consts::PI;

use glam::Vec2;
use thiserror::Error;

/// Overshoot amount used by [`Easing::back_default`].
pub const BACK_DEFAULT_AMOUNT: f32 = 1.701_58;

/// Errors raised when constructing an easing curve with invalid shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EasingError {
    /// A shape parameter that must be non-negative was negative.
    #[error("easing parameter `{name}` must be >= 0, got {value}")]
    NegativeParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Which end(s) of the curve are eased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseMode {
    /// Slow start.
    In,
    /// Slow finish.
    Out,
    /// Slow start and finish, mirrored around the midpoint.
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    Sine,
    Poly(f32),
    Expo,
    Circ(i32),
    Elastic(i32),
    Bounce(i32),
    Back(f32),
}

/// A validated easing curve paired with its [`EaseMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    curve: Curve,
    mode: EaseMode,
}

fn non_negative(name: &'static str, value: f32) -> Result<(), EasingError> {
    if value < 0.0 {
        return Err(EasingError::NegativeParameter { name, value });
    }
    Ok(())
}

impl Easing {
    /// Sine easing.
    pub fn sine(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Sine,
            mode,
        }
    }

    /// Polynomial easing `t^c`.
    pub fn poly(c: f32, mode: EaseMode) -> Result<Self, EasingError> {
        non_negative("c", c)?;
        Ok(Self {
            curve: Curve::Poly(c),
            mode,
        })
    }

    /// Polynomial easing with `c = 2`.
    pub fn quadratic(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Poly(2.0),
            mode,
        }
    }

    /// Polynomial easing with `c = 3`.
    pub fn cubic(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Poly(3.0),
            mode,
        }
    }

    /// Polynomial easing with `c = 4`.
    pub fn quartic(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Poly(4.0),
            mode,
        }
    }

    /// Polynomial easing with `c = 5`.
    pub fn quintic(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Poly(5.0),
            mode,
        }
    }

    /// Exponential (`2^x`) easing.
    pub fn expo(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Expo,
            mode,
        }
    }

    /// Circular easing built from roots and powers of the given roundness.
    pub fn circ(roundness: i32, mode: EaseMode) -> Result<Self, EasingError> {
        non_negative("roundness", roundness as f32)?;
        Ok(Self {
            curve: Curve::Circ(roundness),
            mode,
        })
    }

    /// Circular easing with roundness 2 (a quarter circle).
    pub fn circular(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Circ(2),
            mode,
        }
    }

    /// Elastic easing; `c` is the number of oscillations over the span.
    pub fn elastic(c: i32, mode: EaseMode) -> Result<Self, EasingError> {
        non_negative("c", c as f32)?;
        Ok(Self {
            curve: Curve::Elastic(c),
            mode,
        })
    }

    /// Bounce easing: the absolute value of the elastic oscillation.
    pub fn bounce(c: i32, mode: EaseMode) -> Result<Self, EasingError> {
        non_negative("c", c as f32)?;
        Ok(Self {
            curve: Curve::Bounce(c),
            mode,
        })
    }

    /// Back easing that overshoots by `amount` before settling.
    pub fn back(amount: f32, mode: EaseMode) -> Result<Self, EasingError> {
        non_negative("amount", amount)?;
        Ok(Self {
            curve: Curve::Back(amount),
            mode,
        })
    }

    /// Back easing with [`BACK_DEFAULT_AMOUNT`].
    pub fn back_default(mode: EaseMode) -> Self {
        Self {
            curve: Curve::Back(BACK_DEFAULT_AMOUNT),
            mode,
        }
    }

    /// The easing mode.
    pub fn mode(&self) -> EaseMode {
        self.mode
    }

    /// Evaluate the curve between keyframes `a` and `b` at `x`.
    pub fn sample(&self, a: Vec2, b: Vec2, x: f32) -> f32 {
        if x < a.x {
            return 0.0;
        }
        if x > b.x {
            return b.y;
        }
        b.y * self.shape(relative_x(a, b, x))
    }

    /// The normalized curve value at `t` in `[0, 1]`.
    fn shape(&self, t: f32) -> f32 {
        match (self.curve, self.mode) {
            (Curve::Sine, EaseMode::In) => 1.0 - (PI * t / 2.0).cos(),
            (Curve::Sine, EaseMode::Out) => (PI * t / 2.0).sin(),
            (Curve::Sine, EaseMode::InOut) => 0.5 - (PI * t).cos() / 2.0,

            (Curve::Poly(c), EaseMode::In) => t.powf(c),
            (Curve::Poly(c), EaseMode::Out) => 1.0 - (1.0 - t).powf(c),
            (Curve::Poly(c), EaseMode::InOut) => {
                if t < 0.5 {
                    2f32.powf(c - 1.0) * t.powf(c)
                } else {
                    1.0 - (2.0 - 2.0 * t).powf(c) / 2.0
                }
            }

            (Curve::Expo, EaseMode::In) => 2f32.powf(10.0 * t - 10.0),
            (Curve::Expo, EaseMode::Out) => 1.0 - 2f32.powf(-10.0 * t),
            (Curve::Expo, EaseMode::InOut) => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(10.0 - 20.0 * t)) / 2.0
                }
            }

            (Curve::Circ(r), EaseMode::In) => 1.0 - root(1.0 - t.powi(r), r),
            (Curve::Circ(r), EaseMode::Out) => root(1.0 - (t - 1.0).powi(r), r),
            (Curve::Circ(r), EaseMode::InOut) => {
                if t < 0.5 {
                    (1.0 - root(1.0 - (2.0 * t).powi(r), r)) / 2.0
                } else {
                    (root(1.0 - (2.0 - 2.0 * t).powi(r), r) + 1.0) / 2.0
                }
            }

            (Curve::Elastic(c), EaseMode::In) => wave_cos(c, t) * t,
            (Curve::Elastic(c), EaseMode::Out) => 1.0 - wave_cos(c, t) * (1.0 - t),
            (Curve::Elastic(c), EaseMode::InOut) => t + wave_sin(c, t) * (PI * t).sin(),

            (Curve::Bounce(c), EaseMode::In) => (wave_cos(c, t) * t).abs(),
            (Curve::Bounce(c), EaseMode::Out) => 1.0 - (wave_cos(c, t) * (1.0 - t)).abs(),
            (Curve::Bounce(c), EaseMode::InOut) => t + (wave_sin(c, t) * (PI * t).sin()).abs(),

            (Curve::Back(c1), EaseMode::In) => (c1 + 1.0) * t.powi(3) - c1 * t.powi(2),
            (Curve::Back(c1), EaseMode::Out) => {
                1.0 + (c1 + 1.0) * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            (Curve::Back(c1), EaseMode::InOut) => {
                let c3 = c1 * 1.525;
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((c3 + 1.0) * 2.0 * t - c3) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c3 + 1.0) * (2.0 * t - 2.0) + c3) + 2.0) / 2.0
                }
            }
        }
    }
}

fn root(value: f32, r: i32) -> f32 {
    if r == 0 {
        return value;
    }
    value.max(0.0).powf(1.0 / r as f32)
}

fn wave_cos(c: i32, t: f32) -> f32 {
    (2.0 * PI * c as f32 * t).cos()
}

fn wave_sin(c: i32, t: f32) -> f32 {
    (2.0 * PI * c as f32 * t).sin()
}

/// Normalized position of `x` between the keyframes' X coordinates.
pub fn relative_x(a: Vec2, b: Vec2, x: f32) -> f32 {
    (x - a.x) / (b.x - a.x)
}

/// Sinusoidal limb swing used by walking animations.
///
/// `range` and `frequency` scale the base swing of 1.4 radians at 0.6662 rad per
/// unit of limb angle.
pub fn leg_animation(
    base: f32,
    range: f32,
    frequency: f32,
    limb_angle: f32,
    limb_distance: f32,
    inverted: bool,
) -> f32 {
    let wave = (limb_angle * (0.6662 * frequency)).sin() * (1.4 * range) * limb_distance;
    if inverted { base + wave } else { base - wave }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Vec2 = Vec2::new(0.0, 0.0);
    const B: Vec2 = Vec2::new(10.0, 4.0);

    fn all_curves(mode: EaseMode) -> Vec<Easing> {
        vec![
            Easing::sine(mode),
            Easing::quadratic(mode),
            Easing::cubic(mode),
            Easing::quartic(mode),
            Easing::quintic(mode),
            Easing::circular(mode),
            Easing::elastic(3, mode).unwrap(),
            Easing::bounce(3, mode).unwrap(),
            Easing::back_default(mode),
        ]
    }

    #[test]
    fn test_before_first_keyframe_is_zero() {
        for mode in [EaseMode::In, EaseMode::Out, EaseMode::InOut] {
            for easing in all_curves(mode) {
                assert_eq!(easing.sample(A, B, -1.0), 0.0, "{easing:?}");
            }
        }
    }

    #[test]
    fn test_after_last_keyframe_is_target() {
        for mode in [EaseMode::In, EaseMode::Out, EaseMode::InOut] {
            for easing in all_curves(mode) {
                assert_eq!(easing.sample(A, B, 11.0), B.y, "{easing:?}");
            }
        }
    }

    #[test]
    fn test_curves_hit_keyframe_values() {
        for mode in [EaseMode::In, EaseMode::Out, EaseMode::InOut] {
            for easing in all_curves(mode) {
                let start = easing.sample(A, B, 0.0);
                let end = easing.sample(A, B, 10.0);
                assert!(start.abs() < 1e-4, "{easing:?} starts at {start}");
                assert!((end - B.y).abs() < 1e-4, "{easing:?} ends at {end}");
            }
        }
    }

    #[test]
    fn test_in_out_curves_cross_midpoint_at_half() {
        for easing in [
            Easing::sine(EaseMode::InOut),
            Easing::quadratic(EaseMode::InOut),
            Easing::cubic(EaseMode::InOut),
            Easing::expo(EaseMode::InOut),
        ] {
            let mid = easing.sample(A, B, 5.0);
            assert!((mid - B.y / 2.0).abs() < 1e-4, "{easing:?} midpoint {mid}");
        }
    }

    #[test]
    fn test_quadratic_in_matches_square() {
        let easing = Easing::quadratic(EaseMode::In);
        let value = easing.sample(A, B, 5.0);
        assert!((value - 1.0).abs() < 1e-6, "0.5^2 * 4 = 1, got {value}");
    }

    #[test]
    fn test_back_in_overshoots_below_zero() {
        let easing = Easing::back_default(EaseMode::In);
        assert!(easing.sample(A, B, 2.0) < 0.0);
    }

    #[test]
    fn test_negative_parameters_rejected() {
        assert_eq!(
            Easing::poly(-1.0, EaseMode::In),
            Err(EasingError::NegativeParameter {
                name: "c",
                value: -1.0
            })
        );
        assert!(Easing::circ(-2, EaseMode::Out).is_err());
        assert!(Easing::elastic(-1, EaseMode::InOut).is_err());
        assert!(Easing::bounce(-1, EaseMode::InOut).is_err());
        assert!(Easing::back(-0.5, EaseMode::In).is_err());
    }

    #[test]
    fn test_leg_animation_inverts_swing() {
        let forward = leg_animation(0.0, 1.0, 1.0, 1.0, 1.0, false);
        let backward = leg_animation(0.0, 1.0, 1.0, 1.0, 1.0, true);
        assert!((forward + backward).abs() < 1e-6);
        assert_eq!(leg_animation(0.3, 1.0, 1.0, 1.0, 0.0, false), 0.3);
    }
}
