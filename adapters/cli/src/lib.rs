#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless adapter that loads a level and runs the Vortex Defence simulation.

pub mod config;
pub mod driver;

pub use config::{LevelConfig, LevelConfigError, TurretPlacement, WaveEntry};
pub use driver::{Simulation, Summary};
