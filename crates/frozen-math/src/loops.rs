//! Repeating keyframe helpers and cheap value-derived pseudo-random numbers.

use glam::Vec2;

use crate::easing::relative_x;

/// Linear interpolation through `a` and `b`, extended past both keyframes.
pub fn line(a: Vec2, b: Vec2, x: f32) -> f32 {
    relative_x(a, b, x) * (b.y - a.y) + a.y
}

/// Staircase that steps by `b.y - a.y` once per span.
pub fn flat(a: Vec2, b: Vec2, x: f32) -> f32 {
    relative_x(a, b, x).floor() * (b.y - a.y) + a.y
}

/// Staircase that steps by twice the span every two spans.
pub fn flat2(a: Vec2, b: Vec2, x: f32) -> f32 {
    2.0 * (relative_x(a, b, x) / 2.0).floor() * (b.y - a.y) + a.y
}

/// Descending saw tooth: the mirror image of [`loop_value`].
pub fn inverse(a: Vec2, b: Vec2, x: f32) -> f32 {
    flat(a, b, x) + b.y - line(a, b, x)
}

/// Saw tooth that repeats from `a.y` up to `b.y` every span.
pub fn loop_value(a: Vec2, b: Vec2, x: f32) -> f32 {
    line(a, b, x) - flat(a, b, x) + a.y
}

/// Triangle wave: rises from `a.y` to `b.y` over one span, then falls back.
pub fn boomerang(a: Vec2, b: Vec2, x: f32) -> f32 {
    let rising = line(a, b, x) - flat2(a, b, x) + a.y;
    if rising < b.y {
        rising
    } else {
        inverse(a, b, x)
    }
}

/// Fractional part of `(value + pi^3) * pi^3`.
pub fn raw_seed(value: f32) -> f32 {
    let f = std::f32::consts::PI.powi(3);
    let linear = (value + f) * f;
    linear - linear.floor()
}

/// [`raw_seed`] applied three times for a better-scrambled result in `[0, 1)`.
pub fn seed(value: f32) -> f32 {
    raw_seed(raw_seed(raw_seed(value)))
}

/// Combine a 2D position and a seed into one value in `[0, 1)`.
pub fn seed_2d(position: Vec2, value: f32) -> f32 {
    raw_seed(position.x) * raw_seed(position.y) * raw_seed(value)
}
