//! Easing curves, loop helpers, and small deterministic math utilities for FrozenLib.

mod easing;
mod loops;

pub use easing::{BACK_DEFAULT_AMOUNT, EaseMode, Easing, EasingError, leg_animation, relative_x};
pub use loops::{boomerang, flat, flat2, inverse, line, loop_value, raw_seed, seed, seed_2d};
