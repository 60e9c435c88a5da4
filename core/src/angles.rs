//! Facing-angle arithmetic shared by ships, turrets and projectiles.
//!
//! Angles are measured in radians with zero pointing up and values growing
//! clockwise, matching a pixel space whose y axis grows downward.

use std::f32::consts::PI;

use glam::Vec2;

use crate::PhysicalPosition;

/// One full turn in radians.
pub const TWO_PI: f32 = std::f32::consts::TAU;

/// Wraps an arbitrary angle into `[0, 2π)`.
#[must_use]
pub fn normalize(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TWO_PI);
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Facing angle required to look from `from` toward `to`.
#[must_use]
pub fn angle_to_reach(from: PhysicalPosition, to: PhysicalPosition) -> f32 {
    let delta = to.to_vec2() - from.to_vec2();
    normalize(delta.y.atan2(delta.x) + PI / 2.0)
}

/// Unit vector pointing along the facing angle.
#[must_use]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Signed rotation in `(-π, π]` that turns `from` onto `to` the short way.
///
/// Positive values turn clockwise.
#[must_use]
pub fn shortest_difference(from: f32, to: f32) -> f32 {
    let difference = normalize(to - from);
    if difference > PI {
        difference - TWO_PI
    } else {
        difference
    }
}

/// Eased per-tick turn rate for closing `difference` radians over `cycles`
/// remaining ticks.
///
/// The base rate spreads the turn evenly; a sine-weighted boost makes wide
/// turns faster than narrow ones. The result is clamped to `[minimum, maximum]`.
#[must_use]
pub fn rotation_increment_per_step(difference: f32, cycles: f32, minimum: f32, maximum: f32) -> f32 {
    let magnitude = difference.abs();
    if cycles <= 0.0 {
        return maximum;
    }

    let base = magnitude / cycles;
    let eased = base + base * 2.0 * magnitude.sin();
    eased.clamp(minimum, maximum)
}

/// Turns `current` toward `target` by at most `max_step`, never past it.
#[must_use]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let difference = shortest_difference(current, target);
    if difference.abs() <= max_step {
        normalize(target)
    } else {
        normalize(current + max_step.copysign(difference))
    }
}
