#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns turrets toward their targets and fires when ready.

use vortex_defence_core::{angles, Command, PlayMode, TurretTarget, TurretView};

/// Largest remaining angular difference at which a turret may fire.
pub const ALIGNMENT_TOLERANCE: f32 = 0.05;

/// Distance from the turret centre to the muzzle in pixels.
pub const MUZZLE_OFFSET: f32 = 24.0;

/// Turret combat system that queues aiming and firing commands.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimTurret` and `Command::FireProjectile` entries.
    ///
    /// A turret rotates by at most its rotation speed per tick and fires once
    /// its cooldown has elapsed and the remaining turn is within
    /// [`ALIGNMENT_TOLERANCE`].
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        turrets: &TurretView,
        targets: &[TurretTarget],
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Attack || targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            let Some(turret) = turrets.get(target.turret) else {
                continue;
            };

            let angle = angles::rotate_toward(turret.angle, target.bearing, turret.rotation_speed);
            if angle != turret.angle {
                self.scratch.push(Command::AimTurret {
                    turret: turret.id,
                    angle,
                });
            }

            let remaining = angles::shortest_difference(angle, target.bearing).abs();
            if turret.since_last_shot >= turret.firing_delay && remaining <= ALIGNMENT_TOLERANCE {
                let origin = turret
                    .position
                    .offset_by(angles::direction(angle) * MUZZLE_OFFSET);
                self.scratch.push(Command::FireProjectile {
                    turret: turret.id,
                    origin,
                    angle,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
