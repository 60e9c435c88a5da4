#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Motion engine that drives ships through their lifecycle along assigned paths.
//!
//! Ships emerge from the origin portal, follow their route with eased turns,
//! and shrink into the destination portal. Destroyed ships spin and shrink
//! before they are discarded. The engine is pure: it reads [`ShipView`]
//! snapshots and answers with [`Command::MoveShip`] requests.

use vortex_defence_core::{
    angles, Command, Event, GridLayout, PlayMode, ShipMotion, ShipSnapshot, ShipState, ShipView,
};

/// Tunable constants of the motion engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Angular difference below which the facing snaps onto the target.
    pub snap_threshold: f32,
    /// Smallest per-tick turn while easing toward a waypoint.
    pub min_turn: f32,
    /// Largest per-tick turn while easing toward a waypoint.
    pub max_turn: f32,
    /// Fraction of a tile at which a waypoint counts as reached.
    pub anticipation_ratio: f32,
    /// Scale change per tick while entering or leaving a portal.
    pub scale_step: f32,
    /// Scale at which a despawning or exploding ship disappears.
    pub min_scale: f32,
    /// Radians per tick a ship spins while inside a portal.
    pub portal_rotation: f32,
    /// Radians per tick an exploding ship spins.
    pub explosion_spin: f32,
    /// Scale lost per tick while exploding.
    pub explosion_shrink: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 0.01,
            min_turn: 0.01,
            max_turn: angles::TWO_PI,
            anticipation_ratio: 0.6,
            scale_step: 0.02,
            min_scale: 0.05,
            portal_rotation: 0.01,
            explosion_spin: 0.3,
            explosion_shrink: 0.05,
        }
    }
}

/// Pure system that reacts to world events and emits ship motion commands.
#[derive(Debug)]
pub struct Movement {
    config: MotionConfig,
    play_mode: PlayMode,
}

impl Movement {
    /// Creates a movement system using the provided constants.
    #[must_use]
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            play_mode: PlayMode::Attack,
        }
    }

    /// Consumes world events and the ship view to emit motion commands.
    ///
    /// Ships only move on ticks that advanced time while attack mode is active.
    pub fn handle(
        &mut self,
        events: &[Event],
        ships: &ShipView,
        layout: &GridLayout,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PlayModeChanged { mode } = event {
                self.play_mode = *mode;
            }
        }

        if self.play_mode == PlayMode::Builder {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for ship in ships.iter() {
            if ship.state == ShipState::Removed {
                continue;
            }

            let motion = advance_ship(ship, layout, &self.config);
            if motion != ship.motion() {
                out.push(Command::MoveShip {
                    ship: ship.id,
                    motion,
                });
            }
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

/// Computes a ship's kinematic state one tick after the snapshot.
#[must_use]
pub fn advance_ship(ship: &ShipSnapshot, layout: &GridLayout, config: &MotionConfig) -> ShipMotion {
    let mut motion = ship.motion();
    match ship.state {
        ShipState::Spawning => {
            motion.scale = (motion.scale + config.scale_step).min(1.0);
            motion.angle = angles::normalize(motion.angle - config.portal_rotation);
            if motion.scale >= 1.0 {
                motion.state = if ship.path.moves() == 0 {
                    ShipState::Despawning
                } else {
                    ShipState::FollowingPath
                };
            }
        }
        ShipState::FollowingPath => follow_path(ship, layout, config, &mut motion),
        ShipState::Despawning => {
            motion.scale = (motion.scale - config.scale_step).max(config.min_scale);
            motion.angle = angles::normalize(motion.angle + config.portal_rotation);
            if motion.scale <= config.min_scale {
                motion.state = ShipState::Removed;
            }
        }
        ShipState::Exploding => {
            motion.scale = (motion.scale - config.explosion_shrink).max(0.0);
            motion.angle = angles::normalize(motion.angle + config.explosion_spin);
            if motion.scale < config.min_scale {
                motion.state = ShipState::Removed;
            }
        }
        ShipState::Removed => {}
    }
    motion
}

fn follow_path(
    ship: &ShipSnapshot,
    layout: &GridLayout,
    config: &MotionConfig,
    motion: &mut ShipMotion,
) {
    let Some(waypoint) = ship.path.get(ship.path_index) else {
        motion.state = ShipState::Despawning;
        return;
    };
    let Ok(target) = layout.center_pixel(waypoint) else {
        return;
    };

    let is_last = ship.path_index + 1 >= ship.path.len();
    let distance = motion.position.distance_to(target);
    if is_last && distance <= ship.speed {
        motion.position = target;
        motion.cell = waypoint;
        motion.state = ShipState::Despawning;
        return;
    }

    let target_angle = angles::angle_to_reach(motion.position, target);
    let difference = angles::shortest_difference(motion.angle, target_angle);
    let cycles = if ship.speed > 0.0 {
        distance / ship.speed
    } else {
        f32::INFINITY
    };

    motion.angle = if difference.abs() < config.snap_threshold || cycles < 1.0 {
        target_angle
    } else {
        let increment =
            angles::rotation_increment_per_step(difference, cycles, config.min_turn, config.max_turn);
        if increment >= difference.abs() {
            target_angle
        } else {
            angles::normalize(motion.angle + increment.copysign(difference))
        }
    };

    motion.position = motion
        .position
        .offset_by(angles::direction(motion.angle) * ship.speed);

    // Corners are cut on purpose: the logical cell moves on before the centre
    // of the waypoint is reached. The radius never drops below one tick of
    // travel, otherwise a ship on small tiles overshoots the waypoint forever.
    let anticipation = (config.anticipation_ratio * layout.tile_size()).max(ship.speed);
    if !is_last && motion.position.distance_to(target) < anticipation {
        motion.cell = waypoint;
        motion.path_index = ship.path_index + 1;
    }
}
