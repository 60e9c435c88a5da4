#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves recorded projectile hits into ship damage.

use vortex_defence_core::{Command, ProjectileView};

/// Damage resolution system that consumes projectiles holding a hit.
#[derive(Debug, Default)]
pub struct Damage;

impl Damage {
    /// Creates a new damage resolution system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::DamageShip` followed by `Command::RemoveProjectile` for
    /// every projectile that struck a ship.
    pub fn handle(&mut self, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for projectile in projectiles.iter() {
            let Some(ship) = projectile.hit else {
                continue;
            };

            out.push(Command::DamageShip {
                ship,
                points: projectile.damage,
            });
            out.push(Command::RemoveProjectile {
                projectile: projectile.id,
            });
        }
    }
}
