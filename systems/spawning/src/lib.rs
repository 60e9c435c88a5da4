#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that releases the ships of a wave.

use std::time::Duration;

use vortex_defence_core::{Command, Event, Path, PlayMode, Wave, WaveElement};

/// Pure system that emits spawn commands for a wave in attack mode.
///
/// Each element waits for its own delay measured from the previous release.
/// At most one ship leaves per tick and time left over after a release is
/// discarded.
#[derive(Debug)]
pub struct Spawning {
    wave: Wave,
    next_element: usize,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system that will release the provided wave.
    #[must_use]
    pub fn new(wave: Wave) -> Self {
        Self {
            wave,
            next_element: 0,
            accumulator: Duration::ZERO,
        }
    }

    /// Number of ships that have not been released yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.wave.len().saturating_sub(self.next_element)
    }

    /// Whether every ship of the wave has been released.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Consumes events and the current route to emit spawn commands.
    ///
    /// Builder mode resets the accumulated time. Without a route the pending
    /// element keeps waiting.
    pub fn handle(
        &mut self,
        events: &[Event],
        play_mode: PlayMode,
        route: Option<&Path>,
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Attack {
            self.accumulator = Duration::ZERO;
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        let Some(element) = self.pending() else {
            return;
        };

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator < element.delay_before_creation {
            return;
        }

        let Some(route) = route else {
            return;
        };

        out.push(Command::SpawnShip {
            kind: element.ship,
            path: route.clone(),
        });
        self.next_element += 1;
        self.accumulator = Duration::ZERO;
    }

    fn pending(&self) -> Option<WaveElement> {
        self.wave.elements().get(self.next_element).copied()
    }
}
