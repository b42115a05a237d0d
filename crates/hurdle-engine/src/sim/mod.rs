//! Simulation of a population of jumping agents.
//!
//! - [`Agent`] - One runner: physics state, linear decision policy, fitness score
//! - [`ObstacleSource`] - The single active obstacle and its respawn rule
//! - [`Population`] - A fixed-size generation of agents sharing one obstacle source
//!
//! # Tick Flow
//!
//! Each call to [`Population::tick`] performs one simulation step:
//!
//! 1. The obstacle moves left by its speed times the caller's speed multiplier
//! 2. An obstacle that left the playfield is replaced at a random offset past the right edge
//! 3. Every living agent decides whether to jump, falls under gravity and scores one point
//! 4. Every living agent overlapping the obstacle is killed
//!
//! Once no agent is alive the population is [`PopulationState::Exhausted`] and the caller
//! replaces it with the next generation.

pub use self::{agent::*, obstacle::*, population::*};

mod agent;
mod obstacle;
mod population;
